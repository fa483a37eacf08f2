pub mod article;
pub mod comment;
pub mod newsletter;
pub mod spot;
pub mod user;

pub use article::{Article, ArticleStatus, ArticleWithAuthor};
pub use comment::{Comment, CommentModerationRow, CommentWithAuthor, NewComment};
pub use newsletter::Newsletter;
pub use spot::{Spot, SpotCategory};
pub use user::User;
