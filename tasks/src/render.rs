//! Renderers for [`ViewModel`]s.
//!
//! Task text is user input. Every renderer here escapes it for its target
//! before it is written out.

use crate::view::{TaskEntry, ViewModel};
use std::fmt::Write;

/// Escapes text for use in HTML element content and quoted attributes
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Plain-text rendering for terminals
pub mod text {
    use super::{TaskEntry, ViewModel, Write};

    /// Replaces control characters so task text can't move the cursor
    fn sanitize(text: &str) -> String {
        text.chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect()
    }

    /// Renders the counters, the active filter and one line per task
    #[must_use]
    pub fn render(view: &ViewModel) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Filter: {} | Total: {}  Completed: {}  Pending: {}",
            view.filter, view.counts.total, view.counts.completed, view.counts.pending
        );

        if view.empty {
            out.push_str("  No tasks to show.\n");
            return out;
        }

        for entry in &view.items {
            match entry {
                TaskEntry::Display(task) => {
                    let _ = writeln!(
                        out,
                        "  [{}] #{:<3} {}  ({} PRIORITY, created {})",
                        if task.checked { 'x' } else { ' ' },
                        task.id,
                        sanitize(&task.text),
                        task.badge,
                        task.created
                    );
                },
                TaskEntry::Edit(task) => {
                    let _ = writeln!(
                        out,
                        "  >>> #{:<3} {} [{}]  (editing: save {} [priority] <text> | cancel)",
                        task.id,
                        sanitize(&task.text),
                        task.priority,
                        task.id
                    );
                },
            }
        }
        out
    }
}

/// HTML fragment rendering
pub mod html {
    use super::{TaskEntry, ViewModel, Write, escape_html};
    use crate::types::{FilterSelector, Priority};
    use crate::view::{DisplayEntry, EditEntry};

    fn display_item(out: &mut String, task: &DisplayEntry) {
        let completed = if task.checked { " completed" } else { "" };
        let checked = if task.checked { " checked" } else { "" };
        let _ = write!(
            out,
            concat!(
                "<div class=\"task-item{completed}\">",
                "<div class=\"task-checkbox{checked}\" data-task-id=\"{id}\"></div>",
                "<div class=\"task-content\">",
                "<div class=\"task-text\">{text}</div>",
                "<div class=\"task-meta\">",
                "<span class=\"priority-badge priority-{priority}\">{badge} PRIORITY</span>",
                "<span>Created: {created}</span>",
                "</div></div>",
                "<div class=\"task-actions\">",
                "<button class=\"action-btn edit-btn\" data-task-id=\"{id}\" data-action=\"edit\">Edit</button>",
                "<button class=\"action-btn delete-btn\" data-task-id=\"{id}\" data-action=\"delete\">Delete</button>",
                "</div></div>"
            ),
            completed = completed,
            checked = checked,
            id = task.id,
            text = escape_html(&task.text),
            priority = task.priority,
            badge = task.badge,
            created = escape_html(&task.created),
        );
    }

    fn edit_item(out: &mut String, task: &EditEntry) {
        let _ = write!(
            out,
            concat!(
                "<div class=\"task-item edit-mode\">",
                "<div class=\"task-content\">",
                "<input type=\"text\" class=\"edit-input\" value=\"{text}\" data-task-id=\"{id}\">",
                "<div class=\"task-meta\">",
                "<select class=\"priority-select\" data-task-id=\"{id}\">"
            ),
            text = escape_html(&task.text),
            id = task.id,
        );
        for priority in Priority::ALL {
            let selected = if priority == task.priority { " selected" } else { "" };
            let label = match priority {
                Priority::Low => "Low",
                Priority::Medium => "Medium",
                Priority::High => "High",
            };
            let _ = write!(
                out,
                "<option value=\"{priority}\"{selected}>{label} Priority</option>"
            );
        }
        let _ = write!(
            out,
            concat!(
                "</select></div></div>",
                "<div class=\"task-actions\">",
                "<button class=\"action-btn save-btn\" data-task-id=\"{id}\" data-action=\"save\">Save</button>",
                "<button class=\"action-btn cancel-btn\" data-action=\"cancel\">Cancel</button>",
                "</div></div>"
            ),
            id = task.id,
        );
    }

    /// Renders the stats, filter controls and task list as an HTML fragment
    #[must_use]
    pub fn render(view: &ViewModel) -> String {
        let mut out = String::new();

        let _ = write!(
            out,
            concat!(
                "<div class=\"stats\">",
                "<span id=\"totalTasks\">{}</span>",
                "<span id=\"completedTasks\">{}</span>",
                "<span id=\"pendingTasks\">{}</span>",
                "</div>"
            ),
            view.counts.total, view.counts.completed, view.counts.pending
        );

        out.push_str("<div class=\"filters\">");
        for filter in FilterSelector::ALL {
            let active = if filter == view.filter { " active" } else { "" };
            let _ = write!(
                out,
                "<button class=\"filter-btn{active}\" data-filter=\"{filter}\">{filter}</button>"
            );
        }
        out.push_str("</div>");

        if view.empty {
            out.push_str("<div id=\"emptyState\">No tasks found</div>");
            return out;
        }

        out.push_str("<div id=\"tasksList\">");
        for entry in &view.items {
            match entry {
                TaskEntry::Display(task) => display_item(&mut out, task),
                TaskEntry::Edit(task) => edit_item(&mut out, task),
            }
        }
        out.push_str("</div>");
        out
    }
}
