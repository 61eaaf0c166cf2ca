//! Display joins over the cached collections.
//!
//! Nothing here enforces referential integrity: a post, comment or like
//! whose user is missing from the roster renders with a blank nickname and
//! avatar.

use std::fmt;

use crate::api::LikeModel;
use crate::models::{Comment, Like, Post, PostId, Profile, UserId};
use crate::state::{AuthState, PostState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Author<'a> {
    pub profile: Option<&'a Profile>,
}

impl<'a> Author<'a> {
    pub fn nickname(&self) -> &'a str {
        self.profile.map(|p| p.nickname.as_str()).unwrap_or("")
    }

    pub fn avatar(&self) -> &'a str {
        self.profile
            .and_then(|p| p.img_profile.as_deref())
            .unwrap_or("")
    }
}

/// First profile in the roster owned by `user`.
pub fn author_of(profiles: &[Profile], user: UserId) -> Author<'_> {
    Author {
        profile: profiles.iter().find(|p| p.user_id == user),
    }
}

/// Comments on a post, in fetch order.
pub fn comments_on(comments: &[Comment], post: PostId) -> impl Iterator<Item = &Comment> {
    comments.iter().filter(move |c| c.post_id == post)
}

/// Likes on a post, in fetch order.
pub fn likes_on(likes: &[Like], post: PostId) -> impl Iterator<Item = &Like> {
    likes.iter().filter(move |l| l.post_id == post)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentLine<'a> {
    pub author: Author<'a>,
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostCard<'a> {
    pub post: &'a Post,
    pub author: Author<'a>,
    pub comments: Vec<CommentLine<'a>>,
    pub likers: Vec<Author<'a>>,
    pub liked_by_me: bool,
}

pub fn post_card<'a>(
    post: &'a Post,
    auth: &'a AuthState,
    posts: &'a PostState,
    model: LikeModel,
) -> PostCard<'a> {
    let profiles = auth.profiles.as_slice();
    let liker_ids: Vec<UserId> = match model {
        LikeModel::Joined => likes_on(&posts.likes, post.id).map(|l| l.user_id).collect(),
        LikeModel::Embedded => post.liked.clone(),
    };
    let liked_by_me = auth
        .my_user_id()
        .is_some_and(|me| liker_ids.contains(&me));

    PostCard {
        post,
        author: author_of(profiles, post.user_id),
        comments: comments_on(&posts.comments, post.id)
            .map(|c| CommentLine {
                author: author_of(profiles, c.user_id),
                text: &c.text,
            })
            .collect(),
        likers: liker_ids
            .iter()
            .map(|id| author_of(profiles, *id))
            .collect(),
        liked_by_me,
    }
}

/// Newest first. Posts with an empty title are placeholders and are skipped.
pub fn feed<'a>(auth: &'a AuthState, posts: &'a PostState, model: LikeModel) -> Vec<PostCard<'a>> {
    posts
        .posts
        .iter()
        .rev()
        .filter(|p| !p.title.is_empty())
        .map(|p| post_card(p, auth, posts, model))
        .collect()
}

impl fmt::Display for PostCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{} {} by {}", self.post.id, self.post.title, self.author.nickname())?;
        if let Some(img) = &self.post.img_post {
            writeln!(f, "  image: {}", img)?;
        }
        let names: Vec<&str> = self.likers.iter().map(|a| a.nickname()).collect();
        let mark = if self.liked_by_me { " (you like this)" } else { "" };
        writeln!(f, "  likes: {} [{}]{}", self.likers.len(), names.join(", "), mark)?;
        for line in &self.comments {
            writeln!(f, "  {}: {}", line.author.nickname(), line.text)?;
        }
        Ok(())
    }
}
