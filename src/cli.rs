//! Command-line parsing
//!
//! Numeric options are deliberately forgiving: a value that is not a positive
//! integer is ignored and the previous value is kept, without a diagnostic.
//! Unknown options and options missing their value are reported and skipped;
//! they never stop the bar from starting.

use clap::{ArgAction, Parser};
use std::ops::ControlFlow;
use tracing::warn;

use crate::config::{Config, Edge};
use crate::constants::program;

#[derive(Parser, Debug)]
#[command(
    name = program::NAME,
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Cli {
    /// Always on top
    #[arg(short = 'a')]
    pub always_on_top: bool,

    /// Bar width in pixels
    #[arg(short = 'w', value_name = "W", allow_hyphen_values = true, action = ArgAction::Append)]
    pub width: Vec<String>,

    /// Polling interval in seconds
    #[arg(short = 'p', value_name = "P", allow_hyphen_values = true, action = ArgAction::Append)]
    pub poll_interval: Vec<String>,

    /// Wireless interface name
    #[arg(short = 'i', value_name = "I", allow_hyphen_values = true, action = ArgAction::Append)]
    pub interface: Vec<String>,

    /// top | bottom | left | right
    #[arg(value_name = "EDGE")]
    pub edge: Vec<String>,
}

/// What `main` should do after parsing
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    PrintVersion,
    PrintHelp,
}

/// Parse `args` (program name first) into a command. Never fails: bad
/// options are warned about and dropped.
pub fn parse_command(args: impl IntoIterator<Item = String>) -> Command {
    let args: Vec<String> = args.into_iter().collect();
    match normalize(&args) {
        ControlFlow::Break(command) => command,
        ControlFlow::Continue(args) => match Cli::try_parse_from(args) {
            Ok(cli) => Command::Run(cli.into_config()),
            Err(e) => {
                warn!(error = %e, "Ignoring unparsable command line, using defaults");
                Command::Run(Config::default())
            }
        },
    }
}

/// Walk argv the way getopt("vhw:p:ai:") does and rebuild it in a form clap
/// always accepts.
///
/// `-v`/`-h` stop the walk as soon as they are seen, so the first of the two
/// wins. Option clusters (`-aw5`) are split, values may be attached or the
/// next argument, and positionals may appear anywhere; they are moved behind
/// a `--`.
fn normalize(args: &[String]) -> ControlFlow<Command, Vec<String>> {
    let mut options = vec![
        args.first().cloned().unwrap_or_else(|| program::NAME.to_string()),
    ];
    let mut positionals = Vec::new();
    let mut rest = args.iter().skip(1);

    while let Some(arg) = rest.next() {
        if arg == "--" {
            positionals.extend(rest.by_ref().cloned());
            break;
        }
        let Some(cluster) = arg.strip_prefix('-').filter(|cluster| !cluster.is_empty()) else {
            positionals.push(arg.clone());
            continue;
        };

        for (pos, option) in cluster.char_indices() {
            match option {
                'v' => return ControlFlow::Break(Command::PrintVersion),
                'h' => return ControlFlow::Break(Command::PrintHelp),
                'a' => options.push("-a".to_string()),
                'w' | 'p' | 'i' => {
                    let attached = &cluster[pos + option.len_utf8()..];
                    let value = if attached.is_empty() {
                        rest.next().cloned()
                    } else {
                        Some(attached.to_string())
                    };
                    match value {
                        // Attached form keeps values like "--" or "-5" unambiguous
                        Some(value) if !value.is_empty() => options.push(format!("-{option}{value}")),
                        Some(value) => options.extend([format!("-{option}"), value]),
                        None => warn!(option = %option, "option requires an argument, ignoring"),
                    }
                    // The value used up the rest of the cluster
                    break;
                }
                _ => warn!(option = %option, "invalid option, ignoring"),
            }
        }
    }

    options.push("--".to_string());
    options.extend(positionals);
    ControlFlow::Continue(options)
}

impl Cli {
    /// Fold the parsed flags over the default configuration
    pub fn into_config(self) -> Config {
        let mut config = Config::default();

        config.always_on_top = self.always_on_top;

        for value in &self.width {
            if let Some(width) = positive::<u16>(value) {
                config.bar_width = width;
            }
        }
        for value in &self.poll_interval {
            if let Some(secs) = positive::<u64>(value) {
                config.poll_interval = std::time::Duration::from_secs(secs);
            }
        }
        if let Some(interface) = self.interface.last() {
            config.interface = interface_basename(interface).to_string();
        }
        if let Some(edge) = self.edge.first().and_then(|arg| Edge::from_arg(arg)) {
            config.edge = edge;
        }

        config
    }
}

/// C `atoi`: optional leading whitespace and sign, then as many digits as
/// there are. No digits means 0.
fn atoi(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    if negative { -magnitude } else { magnitude }
}

/// Parse with `atoi` rules; `None` unless the result is >= 1 and fits `T`
fn positive<T: TryFrom<i64>>(text: &str) -> Option<T> {
    let value = atoi(text);
    if value < 1 {
        return None;
    }
    T::try_from(value).ok()
}

/// Accept a device path as well as a bare name
fn interface_basename(value: &str) -> &str {
    value.rsplit('/').next().unwrap_or(value)
}

pub fn version_banner() -> String {
    format!(
        "\n{}, version {}, by {}\n\
         This program is Free Software, released under the GPL License.\n",
        program::NAME,
        program::VERSION,
        program::AUTHOR
    )
}

pub fn usage() -> String {
    format!(
        "\n{} [-a] [-w width] [-p interval] [-i interface] [top | bottom | left | right]\n\
         \t-a\talways on top (default NO)\n\
         \t-p <P>\tproc polling interval (default 1 second)\n\
         \t-w <W>\tbar width (default 2 pixels)\n\
         \t-i <I>\twireless interface name (default 'eth1')\n\
         \t-v\tshow version\n\
         \t-h\tshow help\n",
        program::NAME
    )
}
