//! Media components
//!
//! [`AuthMedia`] shows images, video and audio; [`AuthDocument`] shows a
//! download affordance. Both render inside a [`MediaFrame`] box that keeps
//! its size while the content is pending.

mod auth_document;
mod auth_media;
mod frame;

pub use auth_document::*;
pub use auth_media::*;
pub use frame::*;
