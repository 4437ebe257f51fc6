// Library root
// -----------
// This crate exposes a small library surface for the example CLI. The
// binary (`main.rs`) parses its arguments and hands them to `ui::run`.
//
// Module responsibilities:
// - `config`: positional argument parsing and the usage line.
// - `error`: the error type shared by the library modules.
// - `api`: the HTTP session against the Visallo server (login, current
//   user metadata, vertex creation, logout) and the response shapes.
// - `ui`: runs the steps in order and reports progress on the terminal.
pub mod api;
pub mod config;
pub mod error;
pub mod ui;
