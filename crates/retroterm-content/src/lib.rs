//! Content provider -- the profile a session talks about.
//!
//! A [`Profile`] is read-only data: name, contact fields, bio, and ordered
//! skills, projects, experience and education. Profiles load from TOML or
//! JSON; [`resolve_profile`] falls back to the embedded built-in profile when
//! nothing usable is supplied.

pub mod builtin;
pub mod loader;
pub mod profile;

pub use builtin::builtin_profile;
pub use loader::{ProfileFormat, resolve_profile};
pub use profile::{Education, Experience, Profile, Project, Skills};
