//! Snutree Core Types and Definitions
//!
//! This crate provides the entity model shared by every stage of the snutree
//! pipeline. It includes:
//!
//! - **Ranks**: Generational indices, either plain integers or academic
//!   semesters ([`rank::Rank`])
//! - **Entities**: Drawable nodes with a key, an optional rank and render
//!   attributes ([`entity::Entity`])
//! - **Members**: The closed set of member kinds and their labels
//!   ([`member::Member`])
//! - **Affiliations**: Chapter/badge pairs listed by members
//!   ([`affiliation::Affiliation`])
//! - **Schemas**: Conversion of raw key/value rows into members
//!   ([`schema::Schema`])

pub mod affiliation;
pub mod entity;
pub mod error;
pub mod member;
pub mod names;
pub mod rank;
pub mod schema;

pub use error::EntityError;
