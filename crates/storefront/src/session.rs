//! Line-oriented commands for driving the widget from a terminal.

use std::fmt::Write as _;
use std::str::FromStr;

use pocketshop_core::ProductId;
use thiserror::Error;

use crate::state::ShopState;
use crate::surface::{ModalState, ScrollMetrics, Surface, Trigger};
use crate::widget::Event;

/// Viewport height assumed when `scroll` is given no metrics.
const DEFAULT_VIEWPORT: u32 = 800;

/// One line of terminal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Event(Event),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command} expects {expected}")]
    Usage {
        command: &'static str,
        expected: &'static str,
    },
}

pub const HELP: &str = "\
commands:
  scroll [TOP CLIENT HEIGHT]  scroll the product list (default: to the bottom)
  page N                      click page button N
  add ID                      click add-to-cart on product ID
  remove ID                   click remove on cart line ID
  open | close                open or close the cart
  show                        print the rendered widget
  help                        print this message
  quit                        leave";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("scroll", []) => Self::Event(Event::Scroll(ScrollMetrics::at_bottom(
                DEFAULT_VIEWPORT,
                DEFAULT_VIEWPORT,
            ))),
            ("scroll", [top, client, height]) => {
                let parse = |value: &str| {
                    value.parse::<u32>().map_err(|_| CommandError::Usage {
                        command: "scroll",
                        expected: "three pixel values",
                    })
                };
                Self::Event(Event::Scroll(ScrollMetrics::new(
                    parse(*top)?,
                    parse(*client)?,
                    parse(*height)?,
                )))
            }
            ("scroll", _) => {
                return Err(CommandError::Usage {
                    command: "scroll",
                    expected: "no arguments or TOP CLIENT HEIGHT",
                });
            }
            ("page", [page]) => {
                let page = page.parse::<u32>().map_err(|_| CommandError::Usage {
                    command: "page",
                    expected: "a page number",
                })?;
                Self::Event(Event::Click(Trigger::GoToPage(page)))
            }
            ("add", [id]) => Self::Event(Event::Click(Trigger::AddToCart(product_id("add", id)?))),
            ("remove", [id]) => Self::Event(Event::Click(Trigger::RemoveFromCart(product_id(
                "remove", id,
            )?))),
            ("page", _) => {
                return Err(CommandError::Usage {
                    command: "page",
                    expected: "a page number",
                });
            }
            ("add", _) => return Err(product_id_usage("add")),
            ("remove", _) => return Err(product_id_usage("remove")),
            ("open", []) => Self::Event(Event::OpenCart),
            ("close", []) => Self::Event(Event::CloseCart),
            ("show", []) => Self::Show,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        };
        Ok(command)
    }
}

fn product_id(command: &'static str, value: &str) -> Result<ProductId, CommandError> {
    value.parse().map_err(|_| product_id_usage(command))
}

const fn product_id_usage(command: &'static str) -> CommandError {
    CommandError::Usage {
        command,
        expected: "a product id",
    }
}

/// One-line summary of the widget, printed after every change.
#[must_use]
pub fn status_line(state: &ShopState, surface: &Surface, in_flight: usize) -> String {
    let totals = state.cart().totals();
    let mut line = format!(
        "page {} | {} products | cart {} ({} lines, {})",
        state.current_page(),
        surface.tiles().len(),
        state.cart_count(),
        totals.total_items,
        totals.total_price.display(),
    );
    if state.modal() == ModalState::Open {
        line.push_str(" | cart open");
    }
    if in_flight > 0 {
        let _ = write!(line, " | {in_flight} loading");
    }
    line
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clicks() {
        assert_eq!(
            "add 5".parse::<Command>().unwrap(),
            Command::Event(Event::Click(Trigger::AddToCart(ProductId::new(5))))
        );
        assert_eq!(
            "  REMOVE 12 ".parse::<Command>().unwrap(),
            Command::Event(Event::Click(Trigger::RemoveFromCart(ProductId::new(12))))
        );
        assert_eq!(
            "page 3".parse::<Command>().unwrap(),
            Command::Event(Event::Click(Trigger::GoToPage(3)))
        );
    }

    #[test]
    fn test_parse_scroll() {
        let Command::Event(Event::Scroll(metrics)) = "scroll".parse().unwrap() else {
            panic!("expected a scroll event");
        };
        assert!(metrics.near_bottom(10));

        let Command::Event(Event::Scroll(metrics)) = "scroll 0 600 2000".parse().unwrap() else {
            panic!("expected a scroll event");
        };
        assert!(!metrics.near_bottom(10));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert!(matches!(
            "add".parse::<Command>(),
            Err(CommandError::Usage { command: "add", .. })
        ));
        assert!(matches!(
            "remove abc".parse::<Command>(),
            Err(CommandError::Usage { command: "remove", .. })
        ));
        assert!(matches!(
            "scroll 1 2".parse::<Command>(),
            Err(CommandError::Usage { command: "scroll", .. })
        ));
    }

    #[test]
    fn test_parse_plain_commands() {
        assert_eq!("open".parse::<Command>().unwrap(), Command::Event(Event::OpenCart));
        assert_eq!("close".parse::<Command>().unwrap(), Command::Event(Event::CloseCart));
        assert_eq!("show".parse::<Command>().unwrap(), Command::Show);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("?".parse::<Command>().unwrap(), Command::Help);
    }

    #[test]
    fn test_status_line() {
        let state = ShopState::new();
        let surface = Surface::new();

        assert_eq!(
            status_line(&state, &surface, 1),
            "page 1 | 0 products | cart 0 (0 lines, $0.00) | 1 loading"
        );
    }
}
