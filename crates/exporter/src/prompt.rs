use std::io::{self, Write};

use common::{AppError, Result};
use sonar_client::ProjectRef;

/// Validated project selection: everything that is neither `all` nor an
/// index within range is rejected through the same error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    Index(usize),
}

pub fn parse_selection(input: &str, project_count: usize) -> Result<Selection> {
    let trimmed = input.trim();
    if trimmed == "all" {
        return Ok(Selection::All);
    }
    match trimmed.parse::<usize>() {
        Ok(index) if (1..=project_count).contains(&index) => Ok(Selection::Index(index)),
        _ => Err(AppError::selection(format!(
            "expected 'all' or a project number between 1 and {project_count}, got '{trimmed}'"
        ))),
    }
}

/// Lists discovered projects 1-based and reads one selection from stdin.
pub fn prompt_selection(projects: &[ProjectRef]) -> Result<Selection> {
    for (position, project) in projects.iter().enumerate() {
        println!("{} {}", position + 1, project.name);
    }
    print!(
        "Type project number to choose one project or type 'all' in lowercase \
         letters to extract all projects: "
    );
    io::stdout().flush().map_err(anyhow::Error::from)?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(anyhow::Error::from)?;
    parse_selection(&input, projects.len())
}
