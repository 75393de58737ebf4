//! Integration test crate for ClipMark.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! Editor scenarios run against the in-memory fakes in `support`; the
//! `media` tests drive the real file-backed components.

#[cfg(test)]
mod support;

#[cfg(test)]
mod preview;

#[cfg(test)]
mod export;

#[cfg(test)]
mod editing;

#[cfg(test)]
mod media;
