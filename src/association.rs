//! Associations - has-many / belongs-to links resolved by naming convention.

use crate::naming;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssociationKind {
    HasMany,
    BelongsTo,
}

/// A named link from one entity type to another.
///
/// Nothing is checked when the association is declared: the target type and
/// the foreign field are looked up each time the association is read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Association {
    kind: AssociationKind,
    name: String,
    target: String,
    foreign_key: String,
}

impl Association {
    /// `Person` has many `pets`: target `Pet`, whose records hold the owner
    /// in their `person` field.
    pub fn has_many(owner: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Association {
            kind: AssociationKind::HasMany,
            target: naming::classify(&naming::singularize(&name)),
            foreign_key: naming::underscore(owner),
            name,
        }
    }

    /// `Pet` belongs to `owner`: target `Owner`, searched by its `pet` field.
    pub fn belongs_to(owner: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Association {
            kind: AssociationKind::BelongsTo,
            target: naming::classify(&name),
            foreign_key: naming::underscore(owner),
            name,
        }
    }

    pub fn kind(&self) -> AssociationKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entity type name the association resolves to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Field on the target records compared against the owner's reference.
    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }
}
