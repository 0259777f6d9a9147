//! Demo board installed on first start.

use chrono::{Duration, Utc};
use rusqlite::params;
use taskboard_core::model::{Column, Tag};

use super::{new_id, SqliteStore, StoreError};

const AVATAR_BASE: &str = "https://api.dicebear.com/9.x/thumbs/svg?seed=";

const USERS: [&str; 6] = [
    "Alice Chen",
    "Bob Martinez",
    "Carol Kim",
    "Dave Patel",
    "Eve Johnson",
    "Frank Liu",
];

const ALICE: usize = 0;
const BOB: usize = 1;
const CAROL: usize = 2;
const DAVE: usize = 3;
const EVE: usize = 4;
const FRANK: usize = 5;

struct SeedTask {
    title: &'static str,
    description: &'static str,
    column: Column,
    tags: &'static [Tag],
    age_days: i64,
    assignees: &'static [usize],
}

struct SeedComment {
    task: usize,
    author: usize,
    text: &'static str,
    age_days: i64,
}

const TASKS: [SeedTask; 14] = [
    SeedTask {
        title: "Research caching strategies",
        description: "Investigate Redis, Memcached, and in-memory caching options. Compare performance characteristics and integration complexity for our stack.",
        column: Column::Backlog,
        tags: &[Tag::Api, Tag::Db],
        age_days: 10,
        assignees: &[ALICE, DAVE],
    },
    SeedTask {
        title: "Write API documentation",
        description: "Document all REST endpoints with request/response examples using OpenAPI 3.0. Include authentication flows and error codes.",
        column: Column::Backlog,
        tags: &[Tag::Api],
        age_days: 9,
        assignees: &[BOB, EVE],
    },
    SeedTask {
        title: "Evaluate CI/CD tools",
        description: "Compare GitHub Actions, CircleCI, and GitLab CI for our deployment pipeline. Consider cost, speed, and ecosystem support.",
        column: Column::Backlog,
        tags: &[Tag::Devops],
        age_days: 8,
        assignees: &[CAROL, FRANK],
    },
    SeedTask {
        title: "Design user dashboard",
        description: "Create wireframes and high-fidelity mockups for the main user dashboard. Include data visualization widgets and activity feed.",
        column: Column::Todo,
        tags: &[Tag::App],
        age_days: 8,
        assignees: &[ALICE, CAROL],
    },
    SeedTask {
        title: "Set up monitoring",
        description: "Configure application monitoring with Datadog or Grafana. Set up alerting for error rates, latency p99, and resource usage.",
        column: Column::Todo,
        tags: &[Tag::Devops, Tag::Api],
        age_days: 7,
        assignees: &[DAVE, FRANK],
    },
    SeedTask {
        title: "Create onboarding flow",
        description: "Build a multi-step onboarding wizard for new users. Include profile setup, preference selection, and guided tour of key features.",
        column: Column::Todo,
        tags: &[Tag::App],
        age_days: 7,
        assignees: &[ALICE, BOB, EVE],
    },
    SeedTask {
        title: "Add search functionality",
        description: "Implement full-text search across tasks and comments. Evaluate SQLite FTS5 vs external search service.",
        column: Column::Todo,
        tags: &[Tag::App, Tag::Db],
        age_days: 6,
        assignees: &[CAROL, DAVE],
    },
    SeedTask {
        title: "Implement auth system",
        description: "Build JWT-based authentication with refresh tokens. Include login, signup, password reset, and session management.",
        column: Column::InProgress,
        tags: &[Tag::Api, Tag::App],
        age_days: 6,
        assignees: &[ALICE, BOB],
    },
    SeedTask {
        title: "Build notification service",
        description: "Create a notification system supporting in-app, email, and push notifications. Include preference management and batching.",
        column: Column::InProgress,
        tags: &[Tag::Api],
        age_days: 5,
        assignees: &[CAROL, FRANK, EVE],
    },
    SeedTask {
        title: "Optimize database queries",
        description: "Profile slow queries and add appropriate indexes. Optimize N+1 queries in the task listing and comment fetching endpoints.",
        column: Column::InProgress,
        tags: &[Tag::Db, Tag::Api],
        age_days: 4,
        assignees: &[DAVE, ALICE],
    },
    SeedTask {
        title: "Refactor API endpoints",
        description: "Standardize API response format across all endpoints. Implement consistent error handling and input validation middleware.",
        column: Column::InProgress,
        tags: &[Tag::Api],
        age_days: 3,
        assignees: &[BOB, CAROL],
    },
    SeedTask {
        title: "Set up project structure",
        description: "Initialize the workspace with client and server packages. Configure formatting and linting. Set up shared type definitions.",
        column: Column::Done,
        tags: &[Tag::Devops],
        age_days: 14,
        assignees: &[FRANK, ALICE, DAVE],
    },
    SeedTask {
        title: "Configure linting",
        description: "Set up linting and formatting checks with pre-commit hooks. Only lint changed files to keep commits fast.",
        column: Column::Done,
        tags: &[Tag::Devops],
        age_days: 13,
        assignees: &[EVE, BOB],
    },
    SeedTask {
        title: "Design database schema",
        description: "Design and implement the SQLite schema for users, tasks, assignees, and comments. Include proper foreign keys and indexes.",
        column: Column::Done,
        tags: &[Tag::Db],
        age_days: 12,
        assignees: &[DAVE, CAROL],
    },
];

const COMMENTS: [SeedComment; 16] = [
    SeedComment { task: 0, author: ALICE, text: "I've started a comparison doc for Redis vs Memcached. Redis looks more versatile since we need pub/sub too.", age_days: 9 },
    SeedComment { task: 0, author: DAVE, text: "Good call. We should also benchmark with our actual query patterns, not just synthetic loads.", age_days: 9 },
    SeedComment { task: 0, author: FRANK, text: "Have we considered SQLite's built-in page cache? Might be enough for our current scale.", age_days: 8 },
    SeedComment { task: 1, author: BOB, text: "I'll publish interactive docs. Should we host them on a separate subdomain?", age_days: 8 },
    SeedComment { task: 1, author: EVE, text: "Subdomain would be clean. Also include rate limit headers in the examples.", age_days: 7 },
    SeedComment { task: 2, author: CAROL, text: "GitHub Actions is the obvious choice since we're already on GitHub.", age_days: 7 },
    SeedComment { task: 3, author: ALICE, text: "First round of wireframes are up. Let me know what you think about the layout.", age_days: 7 },
    SeedComment { task: 3, author: BOB, text: "Love the widget approach. We should make them draggable so users can customize their view.", age_days: 6 },
    SeedComment { task: 4, author: DAVE, text: "Grafana + Prometheus is my recommendation. We can self-host and keep costs down.", age_days: 6 },
    SeedComment { task: 5, author: EVE, text: "Make sure we add a skip option. Power users hate being forced through tutorials.", age_days: 5 },
    SeedComment { task: 7, author: ALICE, text: "Access tokens with 15min expiry, refresh tokens in httpOnly cookies with 7-day expiry. Sound good?", age_days: 5 },
    SeedComment { task: 7, author: BOB, text: "Looks solid. Let's also rotate tokens on refresh to prevent replay attacks.", age_days: 4 },
    SeedComment { task: 9, author: DAVE, text: "Found the N+1 issue: we're fetching comments one task at a time. Switching to a batched query.", age_days: 3 },
    SeedComment { task: 10, author: CAROL, text: "Looks clean. Let's also validate requests at the middleware level.", age_days: 1 },
    SeedComment { task: 11, author: FRANK, text: "Workspace is set up. Client and server packages are building independently.", age_days: 13 },
    SeedComment { task: 13, author: CAROL, text: "Added cascade deletes on foreign keys. When a task is deleted, assignees and comments go with it.", age_days: 11 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub tasks: usize,
    pub comments: usize,
}

impl SqliteStore {
    /// Install the demo board when the user table is empty. Returns `None` if
    /// the store already had users.
    pub fn seed_demo_board(&mut self) -> Result<Option<SeedSummary>, StoreError> {
        if self.count_users()? > 0 {
            return Ok(None);
        }

        let now = Utc::now();
        let tx = self.conn.transaction()?;

        let mut user_ids = Vec::with_capacity(USERS.len());
        for name in USERS {
            let id = new_id();
            let first_name = name.split(' ').next().unwrap_or(name);
            tx.execute(
                "INSERT INTO users (id, name, avatar_url) VALUES (?1, ?2, ?3)",
                params![id, name, format!("{AVATAR_BASE}{first_name}")],
            )?;
            user_ids.push(id);
        }

        let mut task_ids = Vec::with_capacity(TASKS.len());
        for column in Column::ALL {
            for (position, seed) in TASKS.iter().filter(|t| t.column == column).enumerate() {
                let id = new_id();
                let created_at = now - Duration::days(seed.age_days);
                tx.execute(
                    r#"
                    INSERT INTO tasks (id, title, description, state, tags, position, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    "#,
                    params![
                        id,
                        seed.title,
                        seed.description,
                        column.as_str(),
                        serde_json::to_string(seed.tags)?,
                        position as u32,
                        created_at,
                        now
                    ],
                )?;
                for user in seed.assignees {
                    tx.execute(
                        "INSERT INTO task_assignees (task_id, user_id) VALUES (?1, ?2)",
                        params![id, user_ids[*user]],
                    )?;
                }
                task_ids.push((seed.title, id));
            }
        }

        for seed in &COMMENTS {
            let title = TASKS[seed.task].title;
            let Some((_, task_id)) = task_ids.iter().find(|(t, _)| *t == title) else {
                continue;
            };
            tx.execute(
                "INSERT INTO comments (id, task_id, author_id, text, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    new_id(),
                    task_id,
                    user_ids[seed.author],
                    seed.text,
                    now - Duration::days(seed.age_days)
                ],
            )?;
        }
        tx.commit()?;

        let summary = SeedSummary {
            users: USERS.len(),
            tasks: TASKS.len(),
            comments: COMMENTS.len(),
        };
        tracing::info!(
            target: "taskboard.store",
            users = summary.users,
            tasks = summary.tasks,
            comments = summary.comments,
            "seeded demo board"
        );
        Ok(Some(summary))
    }
}
