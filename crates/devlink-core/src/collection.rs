//! Mutations of embedded sub-collections.
//!
//! Every operation works on a full in-memory snapshot of the parent document;
//! the caller persists the result with one
//! [`DocumentStore::replace`](crate::store::DocumentStore::replace). New
//! entries always go to the head of the list. Removal always locates the entry
//! by searching for its key (identity for likes, sub-id for everything else);
//! positions are never assumed.

use uuid::Uuid;

use crate::{
  Error, Result,
  guard,
  post::{Comment, Like, Post},
  profile::{Education, Experience, NewEducation, NewExperience, Profile},
};

/// An entry addressable by its own sub-id.
trait Entry {
  fn entry_id(&self) -> Uuid;
}

impl Entry for Comment {
  fn entry_id(&self) -> Uuid { self.id }
}

impl Entry for Experience {
  fn entry_id(&self) -> Uuid { self.id }
}

impl Entry for Education {
  fn entry_id(&self) -> Uuid { self.id }
}

fn position_of<T: Entry>(entries: &[T], id: Uuid) -> Option<usize> {
  entries.iter().position(|e| e.entry_id() == id)
}

fn remove_by_id<T: Entry>(entries: &mut Vec<T>, id: Uuid) -> Option<T> {
  position_of(entries, id).map(|index| entries.remove(index))
}

// ─── Post: likes ─────────────────────────────────────────────────────────────

impl Post {
  pub fn is_liked_by(&self, identity: Uuid) -> bool {
    self.likes.iter().any(|like| like.user == identity)
  }

  /// Record a like from `identity` at the head of the like list.
  ///
  /// Fails with [`Error::AlreadyLiked`] and leaves the list untouched if that
  /// identity already likes the post.
  pub fn like(&mut self, identity: Uuid) -> Result<&[Like]> {
    if self.is_liked_by(identity) {
      return Err(Error::AlreadyLiked(self.id));
    }
    self.likes.insert(0, Like { user: identity });
    Ok(&self.likes)
  }

  /// Remove the like recorded by `identity`.
  pub fn unlike(&mut self, identity: Uuid) -> Result<&[Like]> {
    let index = self
      .likes
      .iter()
      .position(|like| like.user == identity)
      .ok_or(Error::NotLiked(self.id))?;
    self.likes.remove(index);
    Ok(&self.likes)
  }

  // ─── Post: comments ────────────────────────────────────────────────────────

  /// Prepend `comment`. The same identity may comment any number of times.
  pub fn add_comment(&mut self, comment: Comment) -> &[Comment] {
    self.comments.insert(0, comment);
    &self.comments
  }

  /// Remove the comment with sub-id `comment_id` on behalf of `caller`.
  ///
  /// The comment is located by its own id. Only its author may remove it;
  /// the post's author has no special rights here.
  pub fn remove_comment(
    &mut self,
    comment_id: Uuid,
    caller: Uuid,
  ) -> Result<Comment> {
    let index = position_of(&self.comments, comment_id)
      .ok_or(Error::CommentNotFound(comment_id))?;
    guard::authorize(caller, &self.comments[index])?;
    Ok(self.comments.remove(index))
  }
}

// ─── Profile: experience & education ─────────────────────────────────────────

impl Profile {
  /// Prepend a new experience entry with a fresh sub-id.
  pub fn add_experience(&mut self, entry: NewExperience) -> &Experience {
    self.experience.insert(0, entry.into_entry());
    &self.experience[0]
  }

  pub fn remove_experience(&mut self, id: Uuid) -> Result<Experience> {
    remove_by_id(&mut self.experience, id).ok_or(Error::ExperienceNotFound(id))
  }

  /// Prepend a new education entry with a fresh sub-id.
  pub fn add_education(&mut self, entry: NewEducation) -> &Education {
    self.education.insert(0, entry.into_entry());
    &self.education[0]
  }

  pub fn remove_education(&mut self, id: Uuid) -> Result<Education> {
    remove_by_id(&mut self.education, id).ok_or(Error::EducationNotFound(id))
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};

  use super::*;
  use crate::identity::Identity;

  fn identity(name: &str) -> Identity {
    Identity {
      id:            Uuid::new_v4(),
      name:          name.into(),
      email:         format!("{name}@example.com"),
      avatar:        format!("https://avatars.example/{name}"),
      password_hash: String::new(),
      created_at:    Utc::now(),
    }
  }

  fn experience(title: &str) -> NewExperience {
    NewExperience {
      title:       title.into(),
      company:     "Acme".into(),
      location:    None,
      from:        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
      to:          None,
      current:     true,
      description: None,
    }
  }

  fn education(school: &str) -> NewEducation {
    NewEducation {
      school:       school.into(),
      degree:       "BSc".into(),
      fieldofstudy: "Computer Science".into(),
      from:         NaiveDate::from_ymd_opt(2012, 9, 1).unwrap(),
      to:           NaiveDate::from_ymd_opt(2016, 6, 30),
      current:      false,
      description:  None,
    }
  }

  // ── Likes ──────────────────────────────────────────────────────────────────

  #[test]
  fn like_twice_fails_and_keeps_length() {
    let alice = identity("alice");
    let bob = identity("bob");
    let mut post = Post::new(&alice, "hello");

    assert_eq!(post.like(bob.id).unwrap().len(), 1);

    let err = post.like(bob.id).unwrap_err();
    assert!(matches!(err, Error::AlreadyLiked(id) if id == post.id));
    assert_eq!(post.likes, vec![Like { user: bob.id }]);
  }

  #[test]
  fn likes_are_most_recent_first() {
    let alice = identity("alice");
    let bob = identity("bob");
    let carol = identity("carol");
    let mut post = Post::new(&alice, "hello");

    post.like(bob.id).unwrap();
    post.like(carol.id).unwrap();

    assert_eq!(post.likes[0].user, carol.id);
    assert_eq!(post.likes[1].user, bob.id);
  }

  #[test]
  fn unlike_without_like_fails_and_keeps_state() {
    let alice = identity("alice");
    let bob = identity("bob");
    let carol = identity("carol");
    let mut post = Post::new(&alice, "hello");
    post.like(carol.id).unwrap();
    let before = post.clone();

    let err = post.unlike(bob.id).unwrap_err();
    assert!(matches!(err, Error::NotLiked(_)));
    assert_eq!(post, before);
  }

  #[test]
  fn unlike_removes_the_matching_entry_not_the_head() {
    let alice = identity("alice");
    let bob = identity("bob");
    let carol = identity("carol");
    let mut post = Post::new(&alice, "hello");
    post.like(bob.id).unwrap();
    post.like(carol.id).unwrap();

    let likes = post.unlike(bob.id).unwrap();
    assert_eq!(likes, &[Like { user: carol.id }]);
  }

  // ── Comments ───────────────────────────────────────────────────────────────

  #[test]
  fn same_identity_may_comment_repeatedly() {
    let alice = identity("alice");
    let bob = identity("bob");
    let mut post = Post::new(&alice, "hello");

    post.add_comment(Comment::new(&bob, "first"));
    let comments = post.add_comment(Comment::new(&bob, "second"));

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "second");
    assert_eq!(comments[0].name, "bob");
  }

  #[test]
  fn only_comment_author_may_remove_it() {
    let alice = identity("alice");
    let bob = identity("bob");
    let mut post = Post::new(&alice, "hello");
    let comment_id = post.add_comment(Comment::new(&bob, "mine"))[0].id;
    let before = post.comments.clone();

    // The post author is still a stranger to Bob's comment.
    let err = post.remove_comment(comment_id, alice.id).unwrap_err();
    assert!(matches!(err, Error::Forbidden { .. }));
    assert_eq!(post.comments, before);

    let removed = post.remove_comment(comment_id, bob.id).unwrap();
    assert_eq!(removed.id, comment_id);
    assert!(post.comments.is_empty());
  }

  #[test]
  fn remove_comment_targets_sub_id_not_first_by_author() {
    let alice = identity("alice");
    let bob = identity("bob");
    let mut post = Post::new(&alice, "hello");
    let older = post.add_comment(Comment::new(&bob, "older"))[0].id;
    let newer = post.add_comment(Comment::new(&bob, "newer"))[0].id;

    post.remove_comment(older, bob.id).unwrap();

    assert_eq!(post.comments.len(), 1);
    assert_eq!(post.comments[0].id, newer);
  }

  #[test]
  fn remove_unknown_comment_is_not_found() {
    let alice = identity("alice");
    let mut post = Post::new(&alice, "hello");
    post.add_comment(Comment::new(&alice, "note"));

    let missing = Uuid::new_v4();
    let err = post.remove_comment(missing, alice.id).unwrap_err();
    assert!(matches!(err, Error::CommentNotFound(id) if id == missing));
    assert_eq!(post.comments.len(), 1);
  }

  // ── Experience & education ─────────────────────────────────────────────────

  #[test]
  fn experience_add_then_remove_round_trips() {
    let alice = identity("alice");
    let mut profile = Profile::new(alice.id);
    profile.add_experience(experience("Intern"));
    let before = profile.experience.clone();

    let id = profile.add_experience(experience("Engineer")).id;
    assert_eq!(profile.experience.len(), 2);
    assert_eq!(profile.experience[0].title, "Engineer");

    let removed = profile.remove_experience(id).unwrap();
    assert_eq!(removed.title, "Engineer");
    assert_eq!(profile.experience, before);
  }

  #[test]
  fn new_entries_get_distinct_sub_ids() {
    let alice = identity("alice");
    let mut profile = Profile::new(alice.id);
    let a = profile.add_education(education("MIT")).id;
    let b = profile.add_education(education("MIT")).id;
    assert_ne!(a, b);
  }

  #[test]
  fn remove_unknown_entries_are_not_found() {
    let alice = identity("alice");
    let mut profile = Profile::new(alice.id);
    profile.add_experience(experience("Engineer"));
    profile.add_education(education("MIT"));

    assert!(matches!(
      profile.remove_experience(Uuid::new_v4()),
      Err(Error::ExperienceNotFound(_))
    ));
    assert!(matches!(
      profile.remove_education(Uuid::new_v4()),
      Err(Error::EducationNotFound(_))
    ));
    assert_eq!(profile.experience.len(), 1);
    assert_eq!(profile.education.len(), 1);
  }
}
