//! This crate provides the client-side core of a study planner.
//!
//! It provides a client to the planner backend in the [`client`] module, that can be used as a stand-alone module.
//!
//! Tasks are turned into a daily workload (hours per day, calendar entries, progress figures) by the pure functions of the [`workload`] module. \
//! The [`pomodoro`] module provides a focus/break timer, and [`coach`] periodically comments on the progress.
//!
//! A [`Store`](state::Store) ties everything together: it holds the application state, applies user [`Command`](state::Command)s optimistically,
//! and reconciles them with what the backend replies. \
//! A [`Dashboard`](dashboard::Dashboard) is what a page displays for a given state.

pub mod traits;

pub mod task;
pub use task::{Task, TaskId};
pub mod keypoint;
pub mod workload;
pub mod pomodoro;

pub mod client;
pub use client::Client;
pub mod state;
pub use state::{AppState, Command, Store};
pub mod dashboard;
pub mod coach;

pub mod config;
pub mod utils;

mod mock_behaviour;
