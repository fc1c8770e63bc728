//! Ownership checks.
//!
//! Ownership is always per-resource: a comment belongs to whoever wrote it,
//! not to the author of the post it sits under.

use uuid::Uuid;

use crate::{
  Error, Result,
  post::{Comment, Post},
  profile::Profile,
};

/// A resource with a single recorded owner.
pub trait Owned {
  fn owner(&self) -> Uuid;
}

impl Owned for Post {
  fn owner(&self) -> Uuid { self.user }
}

impl Owned for Comment {
  fn owner(&self) -> Uuid { self.user }
}

impl Owned for Profile {
  fn owner(&self) -> Uuid { self.user }
}

/// Succeeds iff `caller` is the recorded owner of `resource`.
pub fn authorize<R: Owned + ?Sized>(caller: Uuid, resource: &R) -> Result<()> {
  let owner = resource.owner();
  if owner == caller {
    Ok(())
  } else {
    Err(Error::Forbidden { caller, owner })
  }
}
