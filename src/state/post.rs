use crate::models::{Comment, Like, LikeRef, Post};

/// Every transition the post container accepts. Creations append the
/// server-returned entity; nothing is inserted optimistically.
#[derive(Debug, Clone, PartialEq)]
pub enum PostAction {
    Loading(bool),
    Composer(bool),
    PostsLoaded(Vec<Post>),
    PostCreated(Post),
    /// Replace the post with the same id (embedded-likes backend).
    PostReplaced(Post),
    CommentsLoaded(Vec<Comment>),
    CommentCreated(Comment),
    LikesLoaded(Vec<Like>),
    LikeCreated(Like),
    LikeDeleted(LikeRef),
}

impl PostAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading(_) => "Loading",
            Self::Composer(_) => "Composer",
            Self::PostsLoaded(_) => "PostsLoaded",
            Self::PostCreated(_) => "PostCreated",
            Self::PostReplaced(_) => "PostReplaced",
            Self::CommentsLoaded(_) => "CommentsLoaded",
            Self::CommentCreated(_) => "CommentCreated",
            Self::LikesLoaded(_) => "LikesLoaded",
            Self::LikeCreated(_) => "LikeCreated",
            Self::LikeDeleted(_) => "LikeDeleted",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostState {
    pub is_loading_post: bool,
    pub open_new_post: bool,
    /// Fetch order; the feed reverses it for display.
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub likes: Vec<Like>,
}

impl PostState {
    pub fn apply(&mut self, action: PostAction) {
        match action {
            PostAction::Loading(on) => self.is_loading_post = on,
            PostAction::Composer(open) => self.open_new_post = open,
            PostAction::PostsLoaded(posts) => self.posts = posts,
            PostAction::PostCreated(post) => self.posts.push(post),
            PostAction::PostReplaced(post) => {
                if let Some(entry) = self.posts.iter_mut().find(|p| p.id == post.id) {
                    *entry = post;
                }
            }
            PostAction::CommentsLoaded(comments) => self.comments = comments,
            PostAction::CommentCreated(comment) => self.comments.push(comment),
            PostAction::LikesLoaded(likes) => self.likes = likes,
            PostAction::LikeCreated(like) => self.likes.push(like),
            PostAction::LikeDeleted(key) => self.likes.retain(|like| !like.matches(&key)),
        }
    }

    pub fn post(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }
}
