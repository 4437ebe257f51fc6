// UI layer: runs the example steps in order and reports each one on the
// terminal. A spinner is shown while a request is in flight and a one-line
// result is printed to stdout once it completes.

use crate::api::{NewVertex, PropertyValue, Session};
use crate::config::Config;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Concept type of the vertex the example creates.
pub const PERSON_CONCEPT: &str = "http://visallo.org/person";
/// Ontology property set on the new vertex.
pub const TITLE_PROPERTY: &str = "http://visallo.org#title";

/// The vertex created by the example: a person with a title.
pub fn example_vertex() -> NewVertex {
    NewVertex {
        vertex_id: Some("V1".to_string()),
        concept_type: PERSON_CONCEPT.to_string(),
        visibility_source: String::new(),
        justification_text: None,
        properties: vec![PropertyValue {
            property_key: "k1".to_string(),
            property_name: TITLE_PROPERTY.to_string(),
            value: "Joe Smith".to_string(),
            visibility_source: String::new(),
            metadata_string: String::new(),
        }],
    }
}

/// Log in, read the session metadata, create the example vertex and log
/// out. Stops at the first failure.
pub fn run(config: &Config) -> Result<()> {
    let mut session = Session::new(config.base_url.as_str())?;

    let spinner = start_spinner("Logging in...")?;
    let login = session.login(&config.username, &config.password);
    spinner.finish_and_clear();
    login.context("login failed")?;
    println!("Logged in as {}", config.username);

    let spinner = start_spinner("Fetching user metadata...")?;
    let me = session.fetch_user_me();
    spinner.finish_and_clear();
    let me = me.context("fetching /user/me failed")?;
    println!("CSRF token: {}", me.csrf_token);
    println!("Workspace: {}", me.current_workspace_id);

    let spinner = start_spinner("Creating vertex...")?;
    let element = session.create_vertex(&example_vertex());
    spinner.finish_and_clear();
    let element = element.context("creating vertex failed")?;
    println!("Created vertex: {}", element.id);

    let spinner = start_spinner("Logging out...")?;
    let logout = session.logout();
    spinner.finish_and_clear();
    logout.context("logout failed")?;
    println!("Logged out");

    Ok(())
}

fn start_spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
