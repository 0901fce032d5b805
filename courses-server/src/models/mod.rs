//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod course;
pub mod member;
pub mod hashtag;
pub mod content;
pub mod review;
pub mod filter;
pub mod pagination;

pub use validation::ValidationError;
pub use course::{
    validate_latitude, validate_longitude, validate_sub_level, Course, CourseDetail, CourseName,
    CoursePatch, NewCourse,
};
pub use member::MemberKind;
pub use hashtag::HashtagTag;
pub use content::{Content, NewContent};
pub use review::{mean_rating, NewReview, Rating, Review, ReviewOutcome, ReviewText};
pub use filter::CourseFilter;
pub use pagination::{Pagination, Paginated, PAGE_SIZE};
