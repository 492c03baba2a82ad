//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use todosync_core::{ServerEvent, Todo};
use unicode_width::UnicodeWidthStr;

const TEXT_WIDTH: usize = 48;

fn check(todo: &Todo) -> ColoredString {
    if todo.completed {
        "[x]".green()
    } else {
        "[ ]".normal()
    }
}

/// Print a single todo.
pub fn print_todo(todo: &Todo) {
    println!("  {} {} {}", check(todo), todo.text, format!("({})", todo.id).dimmed());
}

/// Print todos as a table.
pub fn print_todos(todos: &[Todo]) {
    if todos.is_empty() {
        println!("{}", "No todos.".dimmed());
        return;
    }

    println!("{:<5} {} {}", "Done", pad_visual("Text", TEXT_WIDTH), "ID");
    println!("{}", "-".repeat(TEXT_WIDTH + 44));

    for todo in todos {
        let text = truncate_visual(&todo.text, TEXT_WIDTH);
        let text = if todo.completed {
            pad_visual(&text, TEXT_WIDTH).dimmed()
        } else {
            pad_visual(&text, TEXT_WIDTH).normal()
        };
        println!("{:<5} {} {}", check(todo), text, todo.id.dimmed());
    }
}

/// Print one live event.
pub fn print_event(event: &ServerEvent) {
    match event {
        ServerEvent::InitialTodos(todos) => {
            println!("{} {} todos", "sync".blue().bold(), todos.len());
        }
        ServerEvent::TodoAdded(todo) => {
            print!("{} ", "  + ".green().bold());
            print_todo(todo);
        }
        ServerEvent::TodoUpdated(todo) => {
            print!("{} ", "  ~ ".yellow().bold());
            print_todo(todo);
        }
        ServerEvent::TodoDeleted(id) => {
            println!("{}   {}", "  - ".red().bold(), id.dimmed());
        }
    }
}

/// Pad a string to a visual width.
fn pad_visual(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_visual() {
        assert_eq!(truncate_visual("short", 10), "short");
        assert_eq!(truncate_visual("abcdefghij", 6), "abcd..");
        assert_eq!(UnicodeWidthStr::width(truncate_visual("日本語のテキスト", 7).as_str()), 6);
    }

    #[test]
    fn test_pad_visual() {
        assert_eq!(pad_visual("ab", 4), "ab  ");
        assert_eq!(pad_visual("日本", 5), "日本 ");
        assert_eq!(pad_visual("toolong", 3), "toolong");
    }
}
