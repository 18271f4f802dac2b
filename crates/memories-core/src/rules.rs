//! Social graph and ownership rules
//!
//! Every mutating action the API accepts is decided here. The functions are
//! pure: the requester identity and all affected state come in as arguments,
//! and the result is the new canonical state for the caller to persist.
//! Nothing in this module reads ambient state or touches storage.

use memories_types::{Comment, Memory, PopularUser, User};

use crate::error::{CoreError, Result};

/// Number of entries returned by the popular-users ranking.
pub const POPULAR_USER_LIMIT: usize = 5;

/// Creator-only gate for memory update and delete.
pub fn authorize_mutation(requester_id: &str, memory: &Memory) -> Result<()> {
    if memory.creator_id == requester_id {
        Ok(())
    } else {
        Err(CoreError::NotAuthorized)
    }
}

/// Result of a like toggle: the new like set and the direction it flipped.
#[derive(Debug, Clone, PartialEq)]
pub struct LikeOutcome {
    pub likes: Vec<String>,
    pub liked: bool,
}

/// Flip `user_id`'s membership in the like set.
///
/// A toggle, not a set operation: repeated calls alternate. Any
/// authenticated user may like any memory, including their own.
pub fn toggle_like(likes: &[String], user_id: &str) -> LikeOutcome {
    if likes.iter().any(|id| id == user_id) {
        LikeOutcome {
            likes: likes.iter().filter(|id| *id != user_id).cloned().collect(),
            liked: false,
        }
    } else {
        let mut likes = likes.to_vec();
        likes.push(user_id.to_string());
        LikeOutcome { likes, liked: true }
    }
}

/// Result of a follow toggle: the new state of both sides of the edge.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowOutcome {
    /// New `following` set for the requesting user.
    pub following: Vec<String>,
    /// New `followers` set for the target user.
    pub followers: Vec<String>,
    pub followed: bool,
}

/// Flip the follow edge from `current` to `target`.
///
/// The edge lives on both user records (current.following and
/// target.followers) and both sides are computed together; the caller must
/// persist them as a pair.
pub fn toggle_follow(current: &User, target: &User) -> Result<FollowOutcome> {
    if current.id == target.id {
        return Err(CoreError::SelfFollow);
    }

    if current.is_following(&target.id) {
        Ok(FollowOutcome {
            following: current
                .following
                .iter()
                .filter(|id| **id != target.id)
                .cloned()
                .collect(),
            followers: target
                .followers
                .iter()
                .filter(|id| **id != current.id)
                .cloned()
                .collect(),
            followed: false,
        })
    } else {
        let mut following = current.following.clone();
        following.push(target.id.clone());
        let mut followers = target.followers.clone();
        followers.push(current.id.clone());
        Ok(FollowOutcome {
            following,
            followers,
            followed: true,
        })
    }
}

/// Validate comment text, returning the trimmed form.
pub fn validate_comment_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyComment);
    }
    Ok(trimmed.to_string())
}

/// Prepend a comment: the sequence is ordered newest-first.
pub fn append_comment(comments: &[Comment], comment: Comment) -> Vec<Comment> {
    let mut updated = Vec::with_capacity(comments.len() + 1);
    updated.push(comment);
    updated.extend_from_slice(comments);
    updated
}

/// Normalize tags: trim and lower-case each entry, drop entries that are
/// empty after trimming. Duplicates are preserved.
pub fn normalize_tags<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Order users by follower count descending and keep the top
/// [`POPULAR_USER_LIMIT`]. Equal counts order by ascending id so the
/// ranking is deterministic.
pub fn rank_popular(users: &[User], limit: usize) -> Vec<PopularUser> {
    let mut ranked: Vec<&User> = users.iter().collect();
    ranked.sort_by(|a, b| {
        b.follower_count()
            .cmp(&a.follower_count())
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked
        .into_iter()
        .take(limit)
        .map(|user| PopularUser {
            id: user.id.clone(),
            username: user.username.clone(),
            profile_image: user.profile_image.clone(),
            bio: user.bio.clone(),
            followers_count: user.follower_count(),
        })
        .collect()
}

/// Field-presence validation for registration.
pub fn validate_registration(username: &str, email: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(CoreError::Validation("Username is required".to_string()));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(CoreError::Validation(
            "A valid email is required".to_string(),
        ));
    }
    if password.len() < 6 {
        return Err(CoreError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

/// Default avatar for new accounts, derived from the username.
pub fn default_profile_image(username: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={username}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: &str, followers: &[&str], following: &[&str]) -> User {
        User {
            id: id.to_string(),
            username: format!("user-{id}"),
            email: format!("{id}@example.com"),
            profile_image: String::new(),
            bio: String::new(),
            followers: followers.iter().map(|s| s.to_string()).collect(),
            following: following.iter().map(|s| s.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    fn memory(id: &str, creator_id: &str) -> Memory {
        Memory {
            id: id.to_string(),
            title: "Beach Day".to_string(),
            description: "Sand everywhere".to_string(),
            image: None,
            tags: vec![],
            likes: vec![],
            comments: vec![],
            creator_id: creator_id.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn creator_may_mutate() {
        let m = memory("m1", "alice");
        assert!(authorize_mutation("alice", &m).is_ok());
    }

    #[test]
    fn non_creator_is_rejected() {
        let m = memory("m1", "alice");
        assert!(matches!(
            authorize_mutation("bob", &m),
            Err(CoreError::NotAuthorized)
        ));
    }

    #[test]
    fn like_toggle_is_an_involution() {
        let original = vec!["u1".to_string(), "u2".to_string()];

        let liked = toggle_like(&original, "u3");
        assert!(liked.liked);
        assert_eq!(liked.likes.len(), 3);

        let unliked = toggle_like(&liked.likes, "u3");
        assert!(!unliked.liked);
        assert_eq!(unliked.likes, original);
    }

    #[test]
    fn like_never_duplicates() {
        let likes = vec!["u1".to_string()];
        let outcome = toggle_like(&likes, "u1");
        assert!(outcome.likes.is_empty());
    }

    #[test]
    fn follow_twice_restores_both_sides() {
        let a = user("a", &[], &[]);
        let b = user("b", &[], &[]);

        let first = toggle_follow(&a, &b).unwrap();
        assert!(first.followed);
        assert_eq!(first.following, vec!["b".to_string()]);
        assert_eq!(first.followers, vec!["a".to_string()]);

        let a_after = User {
            following: first.following,
            ..a.clone()
        };
        let b_after = User {
            followers: first.followers,
            ..b.clone()
        };

        let second = toggle_follow(&a_after, &b_after).unwrap();
        assert!(!second.followed);
        assert_eq!(second.following, a.following);
        assert_eq!(second.followers, b.followers);
    }

    #[test]
    fn self_follow_is_rejected() {
        let a = user("a", &[], &[]);
        assert!(matches!(
            toggle_follow(&a, &a),
            Err(CoreError::SelfFollow)
        ));
    }

    #[test]
    fn empty_comment_is_rejected() {
        assert!(matches!(
            validate_comment_text(""),
            Err(CoreError::EmptyComment)
        ));
        assert!(matches!(
            validate_comment_text("   \t "),
            Err(CoreError::EmptyComment)
        ));
    }

    #[test]
    fn new_comment_lands_first() {
        let existing = vec![Comment {
            id: "c1".to_string(),
            text: "old".to_string(),
            creator_id: "u1".to_string(),
            created_at: Utc::now(),
        }];
        let fresh = Comment {
            id: "c2".to_string(),
            text: "nice!".to_string(),
            creator_id: "u2".to_string(),
            created_at: Utc::now(),
        };

        let updated = append_comment(&existing, fresh);
        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].id, "c2");
        assert_eq!(updated[1].id, "c1");
    }

    #[test]
    fn tags_normalize_and_keep_duplicates() {
        let raw = vec!["Travel".to_string(), " food ".to_string(), "FOOD".to_string()];
        assert_eq!(normalize_tags(&raw), vec!["travel", "food", "food"]);
    }

    #[test]
    fn blank_tags_are_dropped() {
        let raw = vec!["  ".to_string(), "Hiking".to_string()];
        assert_eq!(normalize_tags(&raw), vec!["hiking"]);
    }

    #[test]
    fn popular_ranking_orders_by_follower_count() {
        let f5a = ["x1", "x2", "x3", "x4", "x5"];
        let users = vec![
            user("u1", &f5a, &[]),
            user("u2", &f5a, &[]),
            user("u3", &["x1", "x2", "x3"], &[]),
            user("u4", &["x1"], &[]),
            user("u5", &[], &[]),
            user("u6", &[], &[]),
        ];

        let ranked = rank_popular(&users, POPULAR_USER_LIMIT);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].id, "u1");
        assert_eq!(ranked[1].id, "u2");
        assert_eq!(ranked[2].id, "u3");
        assert!(ranked.iter().take(2).all(|u| u.followers_count == 5));
    }

    #[test]
    fn registration_requires_fields() {
        assert!(validate_registration("alice", "alice@example.com", "secret1").is_ok());
        assert!(validate_registration("", "alice@example.com", "secret1").is_err());
        assert!(validate_registration("alice", "not-an-email", "secret1").is_err());
        assert!(validate_registration("alice", "alice@example.com", "short").is_err());
    }
}
