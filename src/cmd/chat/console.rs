use std::io::{self, IsTerminal, Write};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use similar::{ChangeTag, TextDiff};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;

use crate::workspace::ProjectFile;

static PS: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static TS: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

const DIFF_CONTEXT_LINES: usize = 2;

/// Console output for the chat session. Colors are dropped automatically
/// when stdout is not a terminal or NO_COLOR is set.
pub struct Console {
    color_enabled: bool,
}

impl Console {
    pub fn new() -> Self {
        let color_enabled = io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Console { color_enabled }
    }

    pub fn section(&self, title: &str) {
        if self.color_enabled {
            println!("\n{}", title.bold().underline());
        } else {
            println!("\n== {} ==", title);
        }
    }

    pub fn info(&self, msg: &str) {
        println!("{}", msg);
    }

    pub fn hint(&self, msg: &str) {
        if self.color_enabled {
            println!("{}", msg.dimmed());
        } else {
            println!("{}", msg);
        }
    }

    pub fn warning(&self, msg: &str) {
        if self.color_enabled {
            println!("{} {}", "!".yellow().bold(), msg);
        } else {
            println!("! {}", msg);
        }
    }

    pub fn error(&self, msg: &str) {
        if self.color_enabled {
            eprintln!("{} {}", "✖".red().bold(), msg);
        } else {
            eprintln!("x {}", msg);
        }
    }

    pub fn assistant(&self, text: &str) {
        if self.color_enabled {
            println!("\n{} {}", "assistant".cyan().bold(), "·".dimmed());
        } else {
            println!("\nassistant ·");
        }
        println!("{}\n", text);
    }

    /// Print the input prompt and read one line. `None` means EOF.
    pub fn read_input(&self) -> Option<String> {
        if self.color_enabled {
            print!("{} ", "you ❯".green().bold());
        } else {
            print!("you > ");
        }
        io::stdout().flush().ok();

        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches(['\r', '\n']).to_string()),
            Err(_) => None,
        }
    }

    pub fn spinner(&self, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template(&format!("{{spinner}} {}", msg)).expect("spinner style"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }

    pub fn file_created(&self, name: &str) {
        if self.color_enabled {
            println!("  {} {}", "created".green(), name);
        } else {
            println!("  created {}", name);
        }
    }

    pub fn file_updated(&self, name: &str) {
        if self.color_enabled {
            println!("  {} {}", "updated".yellow(), name);
        } else {
            println!("  updated {}", name);
        }
    }

    /// Short unified diff between the previous and new content of an
    /// updated file, with a little context either side of each change.
    pub fn diff(&self, previous: &str, current: &str) {
        let diff = TextDiff::from_lines(previous, current);
        for (i, group) in diff.grouped_ops(DIFF_CONTEXT_LINES).iter().enumerate() {
            if i > 0 {
                println!("  ⋮");
            }
            for op in group {
                for change in diff.iter_changes(op) {
                    let line = change.value().trim_end_matches('\n');
                    match change.tag() {
                        ChangeTag::Delete => {
                            if self.color_enabled {
                                println!("  {}", format!("-{}", line).red());
                            } else {
                                println!("  -{}", line);
                            }
                        }
                        ChangeTag::Insert => {
                            if self.color_enabled {
                                println!("  {}", format!("+{}", line).green());
                            } else {
                                println!("  +{}", line);
                            }
                        }
                        ChangeTag::Equal => {
                            if self.color_enabled {
                                println!("  {}", format!(" {}", line).dimmed());
                            } else {
                                println!("   {}", line);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Syntax-highlighted listing with line numbers for `:show`.
    pub fn show_file(&self, file: &ProjectFile) {
        self.section(&file.name);
        if !self.color_enabled {
            for (i, line) in file.content.lines().enumerate() {
                println!("{:>6} | {}", i + 1, line);
            }
            return;
        }

        let syntax = PS
            .find_syntax_by_extension(extension_of(&file.name))
            .or_else(|| PS.find_syntax_by_token(syntax_token(&file.name)))
            .unwrap_or_else(|| PS.find_syntax_plain_text());
        let theme = TS
            .themes
            .get("base16-ocean.dark")
            .unwrap_or_else(|| TS.themes.values().next().expect("theme"));
        let mut h = HighlightLines::new(syntax, theme);
        for (i, line) in file.content.lines().enumerate() {
            let ranges = h.highlight_line(line, &PS).unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            println!("{:>6} | {}", i + 1, escaped);
        }
        print!("\x1b[0m");
        io::stdout().flush().ok();
    }
}

fn extension_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or("")
}

// syntect's default set has no TypeScript grammar; JavaScript is close
// enough for display purposes.
fn syntax_token(name: &str) -> &str {
    match extension_of(name) {
        "ts" | "tsx" | "jsx" | "js" | "mjs" => "JavaScript",
        "css" => "CSS",
        "json" => "JSON",
        "html" => "HTML",
        "md" => "Markdown",
        _ => "Plain Text",
    }
}
