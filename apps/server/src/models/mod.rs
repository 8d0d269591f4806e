//! Domain models

pub mod candidate;

pub use candidate::{Candidate, CandidateUpdate, NewCandidate, Page, Pagination};
