pub mod campground;
pub mod review;
pub mod user;

pub use campground::{Campground, CampgroundFields, Geometry, Image};
pub use review::{Review, ReviewFields};
pub use user::{AuthorRef, User, UserSummary};
