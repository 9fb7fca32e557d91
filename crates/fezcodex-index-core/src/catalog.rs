//! Hard-coded content layout: log categories, static routes, and palette
//! commands, plus the resource paths the index builder fetches.
//!
//! The builder takes a [`Catalog`] by reference instead of reading these
//! tables directly, so tests can build against fixture catalogs.

use serde::{Deserialize, Serialize};

use crate::models::SearchableRecord;

pub const POSTS_PATH: &str = "/posts/posts.json";
pub const PROJECTS_PATH: &str = "/projects/projects.json";
pub const APPS_PATH: &str = "/apps/apps.json";

/// Log categories served under `/logs/{category}/{category}.json`.
pub const LOG_CATEGORIES: [&str; 9] = [
    "Book", "Movie", "Game", "Article", "Music", "Series", "Food", "Websites", "Tools",
];

/// Resource path of one log category: `/logs/food/food.json` for `Food`.
pub fn log_category_path(category: &str) -> String {
    let lower = category.to_lowercase();
    format!("/logs/{}/{}.json", lower, lower)
}

/// A navigable static page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    pub title: String,
    pub path: String,
}

/// An executable palette action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub title: String,
    pub command_id: String,
}

/// The constant tables the index is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub log_categories: Vec<String>,
    pub routes: Vec<RouteDescriptor>,
    pub commands: Vec<CommandDescriptor>,
}

impl Catalog {
    /// The site's built-in tables.
    pub fn builtin() -> Self {
        Self {
            log_categories: LOG_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            routes: builtin_routes(),
            commands: builtin_commands(),
        }
    }

    /// Static route records, in table order.
    pub fn route_records(&self) -> Vec<SearchableRecord> {
        self.routes
            .iter()
            .map(|r| SearchableRecord::page(r.title.clone(), r.path.clone()))
            .collect()
    }

    /// Static command records, in table order.
    pub fn command_records(&self) -> Vec<SearchableRecord> {
        self.commands
            .iter()
            .map(|c| SearchableRecord::command(c.title.clone(), c.command_id.clone()))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_routes() -> Vec<RouteDescriptor> {
    [
        ("Home", "/"),
        ("Blog", "/blog"),
        ("Projects", "/projects"),
        ("About Me", "/about"),
        ("Logs", "/logs"),
        ("Settings", "/settings"),
        ("Stories", "/stories"),
        ("Apps", "/apps"),
        ("Random", "/random"),
    ]
    .into_iter()
    .map(|(title, path)| RouteDescriptor {
        title: title.to_string(),
        path: path.to_string(),
    })
    .collect()
}

fn builtin_commands() -> Vec<CommandDescriptor> {
    [
        ("View Source on GitHub", "viewSource"),
        ("Navigate to a Random Post", "randomPost"),
        ("Toggle Animations", "toggleAnimations"),
        ("Reset Sidebar State", "resetSidebarState"),
        ("Send Email", "sendEmailFezcode"),
        ("Open GitHub Profile", "openGitHub"),
        ("Open Twitter Profile", "openTwitter"),
        ("Open LinkedIn Profile", "openLinkedIn"),
        ("Scroll to Top", "scrollToTop"),
        ("Scroll to Bottom", "scrollToBottom"),
        ("Show Site Stats", "showSiteStats"),
        ("Show Version", "showVersion"),
    ]
    .into_iter()
    .map(|(title, id)| CommandDescriptor {
        title: title.to_string(),
        command_id: id.to_string(),
    })
    .collect()
}
