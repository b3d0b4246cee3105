//! Server-rendered HTML pages.
//!
//! Every value that came from a user goes through [`escape`] before it is
//! interpolated.

use std::fmt::Write;

use tasker_core::models::{Task, User};

use crate::models::FlashQuery;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Form checks run in the browser, served at [`FORMS_SCRIPT_PATH`].
pub const FORMS_SCRIPT: &str = include_str!("../static/js/forms.js");

pub const FORMS_SCRIPT_PATH: &str = "/static/js/forms.js";

fn base_style() -> &'static str {
    r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
        background: #f5f5f5; color: #333;
    }
    nav {
        background: #1a1a2e; color: #fff; padding: 14px 24px;
        display: flex; justify-content: space-between; align-items: center;
    }
    nav a { color: #fff; text-decoration: none; margin-left: 16px; }
    nav .brand { font-weight: 700; font-size: 18px; margin-left: 0; }
    main { max-width: 720px; margin: 32px auto; padding: 0 20px; }
    .card {
        background: #fff; border-radius: 12px; padding: 24px; margin-bottom: 16px;
        box-shadow: 0 4px 24px rgba(0,0,0,0.06);
    }
    h1 { font-size: 24px; margin-bottom: 16px; color: #1a1a2e; }
    .form-group { margin-bottom: 14px; }
    .form-group label { display: block; font-size: 14px; font-weight: 500; margin-bottom: 6px; }
    .form-group input, .form-group textarea, .form-group select {
        width: 100%; padding: 10px 12px; border: 1.5px solid #ddd;
        border-radius: 8px; font-size: 15px;
    }
    .btn {
        display: inline-block; padding: 10px 18px; border: none; border-radius: 8px;
        font-size: 15px; font-weight: 600; cursor: pointer; text-decoration: none;
    }
    .btn-primary { background: #4a6cf7; color: #fff; }
    .btn-secondary { background: #e8e8e8; color: #333; }
    .btn-danger { background: #d32f2f; color: #fff; }
    .alert { padding: 10px 14px; border-radius: 8px; font-size: 14px; margin-bottom: 16px; }
    .alert-success { background: #edf7ed; color: #1e4620; }
    .alert-error { background: #fff0f0; color: #d32f2f; }
    table { width: 100%; border-collapse: collapse; }
    th, td { text-align: left; padding: 10px 8px; border-bottom: 1px solid #eee; font-size: 14px; }
    .done { color: #2e7d32; font-weight: 600; }
    .open { color: #999; }
    .muted { color: #777; font-size: 14px; }
    .is-invalid { border-color: #d32f2f !important; }
    .field-error { color: #d32f2f; font-size: 13px; margin-top: 4px; }
    "#
}

fn nav(user: Option<&User>) -> String {
    let links = match user {
        Some(user) => format!(
            r#"<span>{name}</span><a href="/tasks/ui">My tasks</a><a href="/tasks/create">New task</a><a href="/logout">Log out</a>"#,
            name = escape(&user.username),
        ),
        None => r#"<a href="/login">Log in</a><a href="/register">Register</a>"#.to_string(),
    };
    format!(r#"<nav><a class="brand" href="/">Tasker</a><div>{links}</div></nav>"#)
}

fn flash_html(flash: &FlashQuery) -> String {
    let mut out = String::new();
    if let Some(msg) = flash.msg.as_deref().filter(|m| !m.is_empty()) {
        let _ = write!(out, r#"<div class="alert alert-success">{}</div>"#, escape(msg));
    }
    if let Some(error) = flash.error.as_deref().filter(|e| !e.is_empty()) {
        let _ = write!(out, r#"<div class="alert alert-error">{}</div>"#, escape(error));
    }
    out
}

fn page(title: &str, user: Option<&User>, flash: &FlashQuery, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title} - Tasker</title>
<style>{style}</style>
<script src="{script}" defer></script>
</head><body>
{nav}
<main>
{flash}
{body}
</main>
</body></html>"#,
        title = escape(title),
        style = base_style(),
        script = FORMS_SCRIPT_PATH,
        nav = nav(user),
        flash = flash_html(flash),
    )
}

pub fn render_home(user: Option<&User>, flash: &FlashQuery) -> String {
    let body = match user {
        Some(user) => format!(
            r#"<div class="card"><h1>Welcome back, {name}!</h1>
<p class="muted">Pick up where you left off.</p><br>
<a class="btn btn-primary" href="/tasks/ui">View my tasks</a>
<a class="btn btn-secondary" href="/tasks/create">New task</a></div>"#,
            name = escape(&user.username),
        ),
        None => r#"<div class="card"><h1>Tasker</h1>
<p class="muted">Keep track of what needs doing.</p><br>
<a class="btn btn-primary" href="/login">Log in</a>
<a class="btn btn-secondary" href="/register">Create an account</a></div>"#
            .to_string(),
    };
    page("Home", user, flash, &body)
}

pub fn render_login(user: Option<&User>, flash: &FlashQuery) -> String {
    let body = r#"<div class="card"><h1>Log in</h1>
<form method="POST" action="/login">
  <div class="form-group"><label>Username</label>
    <input type="text" name="username" required autocomplete="username"></div>
  <div class="form-group"><label>Password</label>
    <input type="password" name="password" required autocomplete="current-password"></div>
  <button type="submit" class="btn btn-primary">Log in</button>
</form>
<p class="muted" style="margin-top:14px">No account? <a href="/register">Register</a></p></div>"#;
    page("Log in", user, flash, body)
}

pub fn render_register(user: Option<&User>, flash: &FlashQuery) -> String {
    let body = r#"<div class="card"><h1>Create an account</h1>
<form method="POST" action="/register">
  <div class="form-group"><label>Username</label>
    <input type="text" name="username" required autocomplete="username"></div>
  <div class="form-group"><label>Email</label>
    <input type="email" name="email" required autocomplete="email"></div>
  <div class="form-group"><label>Password</label>
    <input type="password" name="password" required autocomplete="new-password"></div>
  <div class="form-group"><label>Confirm password</label>
    <input type="password" name="confirm_password" required autocomplete="new-password"></div>
  <button type="submit" class="btn btn-primary">Register</button>
</form>
<p class="muted" style="margin-top:14px">Already registered? <a href="/login">Log in</a></p></div>"#;
    page("Register", user, flash, body)
}

fn status_html(task: &Task) -> &'static str {
    if task.completed {
        r#"<span class="done">Done</span>"#
    } else {
        r#"<span class="open">Open</span>"#
    }
}

fn deadline_text(task: &Task) -> String {
    task.deadline
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "—".to_string())
}

pub fn render_task_list(user: &User, tasks: &[Task], flash: &FlashQuery) -> String {
    let body = if tasks.is_empty() {
        r#"<div class="card"><h1>My tasks</h1>
<p class="muted">Nothing here yet.</p><br>
<a class="btn btn-primary" href="/tasks/create">Create your first task</a></div>"#
            .to_string()
    } else {
        let mut rows = String::new();
        for task in tasks {
            let _ = write!(
                rows,
                r#"<tr><td><a href="/tasks/{id}">{title}</a></td><td>{status}</td><td>{deadline}</td></tr>"#,
                id = task.id,
                title = escape(&task.title),
                status = status_html(task),
                deadline = deadline_text(task),
            );
        }
        format!(
            r#"<div class="card"><h1>My tasks</h1>
<table><thead><tr><th>Title</th><th>Status</th><th>Deadline</th></tr></thead>
<tbody>{rows}</tbody></table><br>
<a class="btn btn-primary" href="/tasks/create">New task</a></div>"#
        )
    };
    page("My tasks", Some(user), flash, &body)
}

/// Create form when `task` is `None`, edit form otherwise.
pub fn render_task_form(user: &User, task: Option<&Task>, flash: &FlashQuery) -> String {
    let (heading, action, title, description, deadline, completed) = match task {
        Some(task) => (
            "Edit task".to_string(),
            format!("/tasks/{}/edit", task.id),
            escape(&task.title),
            escape(task.description.as_deref().unwrap_or("")),
            task.deadline
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            task.completed,
        ),
        None => (
            "New task".to_string(),
            "/tasks/create".to_string(),
            String::new(),
            String::new(),
            String::new(),
            false,
        ),
    };
    let (open_selected, done_selected) = if completed {
        ("", " selected")
    } else {
        (" selected", "")
    };

    let body = format!(
        r#"<div class="card"><h1>{heading}</h1>
<form method="POST" action="{action}">
  <div class="form-group"><label>Title</label>
    <input type="text" name="title" required value="{title}"></div>
  <div class="form-group"><label>Description</label>
    <textarea name="description" rows="4">{description}</textarea></div>
  <div class="form-group"><label>Deadline</label>
    <input type="date" name="deadline" value="{deadline}"></div>
  <div class="form-group"><label>Status</label>
    <select name="completed">
      <option value="false"{open_selected}>Open</option>
      <option value="true"{done_selected}>Done</option>
    </select></div>
  <button type="submit" class="btn btn-primary">Save</button>
  <a class="btn btn-secondary" href="/tasks/ui">Cancel</a>
</form></div>"#
    );
    page(&heading, Some(user), flash, &body)
}

pub fn render_task_view(user: &User, task: &Task, flash: &FlashQuery) -> String {
    let description = task
        .description
        .as_deref()
        .map(escape)
        .unwrap_or_else(|| r#"<span class="muted">No description</span>"#.to_string());

    let body = format!(
        r#"<div class="card"><h1>{title}</h1>
<p>{description}</p><br>
<p class="muted">Status: {status} &middot; Deadline: {deadline}</p><br>
<a class="btn btn-primary" href="/tasks/{id}/edit">Edit</a>
<form method="POST" action="/tasks/{id}/delete" style="display:inline"
      onsubmit="return confirm('Delete this task? This cannot be undone.')">
  <button type="submit" class="btn btn-danger">Delete</button>
</form>
<a class="btn btn-secondary" href="/tasks/ui">Back</a></div>"#,
        title = escape(&task.title),
        status = status_html(task),
        deadline = deadline_text(task),
        id = task.id,
    );
    page(&task.title, Some(user), flash, &body)
}

pub fn render_not_found(user: &User) -> String {
    let body = r#"<div class="card"><h1>Task not found</h1>
<p class="muted">It may have been deleted.</p><br>
<a class="btn btn-secondary" href="/tasks/ui">Back to my tasks</a></div>"#;
    page("Not found", Some(user), &FlashQuery::default(), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
    }

    #[test]
    fn task_content_is_escaped() {
        let task = Task {
            id: 3,
            title: "<b>bold</b>".into(),
            description: Some("a & b".into()),
            completed: true,
            deadline: None,
            owner_id: 1,
        };
        let html = render_task_view(&user(), &task, &FlashQuery::default());
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(!html.contains("<b>bold</b>"));
    }

    #[test]
    fn flash_messages_render() {
        let flash = FlashQuery {
            msg: Some("Saved!".into()),
            error: Some("<oops>".into()),
        };
        let html = render_home(None, &flash);
        assert!(html.contains("Saved!"));
        assert!(html.contains("&lt;oops&gt;"));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let task = Task {
            id: 9,
            title: "Pay \"rent\"".into(),
            description: None,
            completed: true,
            deadline: chrono::NaiveDate::from_ymd_opt(2026, 2, 1),
            owner_id: 1,
        };
        let html = render_task_form(&user(), Some(&task), &FlashQuery::default());
        assert!(html.contains(r#"action="/tasks/9/edit""#));
        assert!(html.contains(r#"value="Pay &quot;rent&quot;""#));
        assert!(html.contains(r#"value="2026-02-01""#));
        assert!(html.contains(r#"<option value="true" selected>"#));
    }
}
