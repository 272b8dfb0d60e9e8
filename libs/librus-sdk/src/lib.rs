#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Authenticated client for the Librus school register API
//!
//! - [`Session`] logs in through the account portal, holds the bearer token
//!   and renews it once on HTTP 401 (refresh, else full re-login) before a
//!   single retry.
//! - A [`Resolver`] per entity type fetches records by ID, caches them in the
//!   client's [`EntityGraph`] and resolves the records they reference.
//!
//! # Example
//!
//! ```ignore
//! use librus_sdk::{ClientConfig, LibrusClient};
//!
//! let client = LibrusClient::with_config(ClientConfig::load(None)?)?;
//! client.login("parent@example.com", &password).await?;
//!
//! for grade in client.grades().fetch_all().await? {
//!     let subject = grade.subject(&client)?;
//!     let category = grade.category(&client)?;
//!     println!("{}: {} ({})", subject.name, grade.value, category.name);
//! }
//! ```

mod client;
mod codec;
mod config;
mod error;
pub mod models;
mod resolver;
mod session;
mod timetable;

#[cfg(test)]
mod testing;

pub use client::LibrusClient;
pub use codec::{decode_plural, decode_single};
pub use config::{
    ClientConfig, DEFAULT_API_URL, DEFAULT_BATCH_LIMIT, DEFAULT_PORTAL_URL, ENV_PREFIX,
};
pub use error::ClientError;
pub use models::{
    AccountInfo, Color, Entity, EntityId, Grade, GradeCategory, Lesson, Notice, Reference,
    ResourceLink, Subject, User,
};
pub use resolver::{EntityCache, EntityGraph, FetchOptions, Resolvable, Resolver};
pub use session::{Credentials, RequestOptions, Session, SessionEvent, SessionState};
pub use timetable::{TimetableEntry, TimetableSlot, TimetableWeek, Timetables, week_start};

pub use librus_http::{HttpClient, HttpClientConfig, HttpError, HttpTransport};
