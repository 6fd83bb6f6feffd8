//! Kitchen order tickets.
//!
//! Tickets render to a fixed-width monospace block suitable for a thermal
//! printer. The spooler prints each ticket a configurable number of times
//! with a pause in between; the stock configuration prints two copies, one
//! for the kitchen and one for the counter.

use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::checkout::OrderReceipt;
use crate::domain::{Order, OrderItem, PaymentMethod};
use crate::error::PrintError;

const TICKET_WIDTH: usize = 32;
const FOOTER: &str = "Thank You! Visit Again";

/// Everything a kitchen ticket shows. Built either from a fresh
/// [`OrderReceipt`] or from a stored [`Order`] for reprints.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub restaurant_name: String,
    pub order_id: String,
    pub placed_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_mobile: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub payment_method: PaymentMethod,
    /// Only shown on reprints of stored orders.
    pub status: Option<String>,
}

impl Ticket {
    pub fn for_receipt(restaurant_name: &str, receipt: &OrderReceipt) -> Self {
        Ticket {
            restaurant_name: restaurant_name.to_string(),
            order_id: receipt.order_id.clone(),
            placed_at: receipt.placed_at,
            customer_name: receipt.customer_name.clone(),
            customer_mobile: receipt.customer_mobile.clone(),
            items: receipt.items.clone(),
            total: receipt.total_amount,
            payment_method: receipt.payment_method,
            status: None,
        }
    }

    pub fn for_order(restaurant_name: &str, order: &Order) -> Self {
        Ticket {
            restaurant_name: restaurant_name.to_string(),
            order_id: order.id.clone(),
            placed_at: order.created_at.unwrap_or_else(Utc::now),
            customer_name: order.customer_name.clone().unwrap_or_else(|| "Guest".to_string()),
            customer_mobile: order.customer_mobile.clone().unwrap_or_else(|| "N/A".to_string()),
            items: order.items.clone(),
            total: order.total(),
            payment_method: order.payment_method(),
            status: Some(order.status().as_str().to_string()),
        }
    }

    /// Last eight characters of the order id, the part an operator reads
    /// aloud. Counted in characters, not bytes.
    pub fn short_id(&self) -> String {
        let chars: Vec<char> = self.order_id.chars().collect();
        let start = chars.len().saturating_sub(8);
        chars[start..].iter().collect()
    }

    /// Renders the ticket as a 32-column monospace block.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "-".repeat(TICKET_WIDTH);

        out.push_str(&center(&self.restaurant_name));
        out.push_str(&center("KITCHEN ORDER TICKET"));
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("Order: #{}\n", self.short_id()));
        out.push_str(&format!("Time:  {}\n", self.placed_at.format("%d/%m/%Y %H:%M")));
        out.push_str(&format!("Name:  {}\n", self.customer_name));
        out.push_str(&format!("Mob:   {}\n", self.customer_mobile));
        if let Some(status) = &self.status {
            out.push_str(&format!("Status: {status}\n"));
        }
        out.push_str(&rule);
        out.push('\n');
        for item in &self.items {
            let left = format!("{} x {}", item.qty, item.item_name);
            out.push_str(&two_column(&left, &format!("₹{:.2}", item.line_total())));
        }
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&two_column("TOTAL", &format!("₹{:.2}", self.total)));
        out.push_str(&two_column("PAYMENT", &self.payment_method.to_string()));
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&center(FOOTER));
        out
    }
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= TICKET_WIDTH {
        return format!("{text}\n");
    }
    let pad = (TICKET_WIDTH - len) / 2;
    format!("{}{}\n", " ".repeat(pad), text)
}

/// Left and right cells separated by spaces, padded to the ticket width.
/// Overlong left cells spill onto their own line.
fn two_column(left: &str, right: &str) -> String {
    let left_len = left.chars().count();
    let right_len = right.chars().count();
    if left_len + right_len + 1 > TICKET_WIDTH {
        let pad = TICKET_WIDTH.saturating_sub(right_len);
        return format!("{left}\n{}{right}\n", " ".repeat(pad));
    }
    let pad = TICKET_WIDTH - left_len - right_len;
    format!("{left}{}{right}\n", " ".repeat(pad))
}

/// Sink a rendered ticket is sent to. Implementations hand the text to a
/// printer driver, a file, or a test buffer.
pub trait TicketPrinter {
    fn print(&mut self, rendered: &str) -> Result<(), PrintError>;
}

/// Writes tickets to stdout, one per print call.
#[derive(Debug, Default)]
pub struct StdoutPrinter;

impl TicketPrinter for StdoutPrinter {
    fn print(&mut self, rendered: &str) -> Result<(), PrintError> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
        Ok(())
    }
}

/// Captures printed tickets for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryPrinter {
    pub printed: Vec<String>,
}

#[cfg(test)]
impl TicketPrinter for MemoryPrinter {
    fn print(&mut self, rendered: &str) -> Result<(), PrintError> {
        self.printed.push(rendered.to_string());
        Ok(())
    }
}

/// Prints each ticket `copies` times, pausing between copies so the
/// printer can finish feeding the previous one.
#[derive(Debug)]
pub struct PrintSpooler<P> {
    printer: P,
    copies: u32,
    pause: Duration,
}

impl<P: TicketPrinter> PrintSpooler<P> {
    pub fn new(printer: P, copies: u32, pause: Duration) -> Self {
        PrintSpooler { printer, copies: copies.max(1), pause }
    }

    #[instrument(skip(self, ticket), fields(order = %ticket.short_id(), copies = self.copies))]
    pub async fn spool(&mut self, ticket: &Ticket) -> Result<(), PrintError> {
        let rendered = ticket.render();
        for copy in 0..self.copies {
            if copy > 0 {
                tokio::time::sleep(self.pause).await;
            }
            self.printer.print(&rendered)?;
        }
        info!(order = %ticket.short_id(), "Ticket spooled");
        Ok(())
    }

    #[cfg(test)]
    pub fn printer(&self) -> &P {
        &self.printer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> Ticket {
        Ticket {
            restaurant_name: "BUDDHA AVENUE".to_string(),
            order_id: "64f1c2a9e8b4d7039a5f12cd".to_string(),
            placed_at: DateTime::parse_from_rfc3339("2024-03-15T14:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            customer_name: "Guest".to_string(),
            customer_mobile: "N/A".to_string(),
            items: vec![OrderItem {
                item_name: "Margherita Pizza".to_string(),
                qty: 2,
                price: 299.0,
            }],
            total: 598.0,
            payment_method: PaymentMethod::Cash,
            status: None,
        }
    }

    #[test]
    fn short_id_takes_the_last_eight_characters() {
        let t = ticket();
        assert_eq!(t.short_id(), "9a5f12cd");

        let mut tiny = ticket();
        tiny.order_id = "ab12".to_string();
        assert_eq!(tiny.short_id(), "ab12");
    }

    #[test]
    fn render_lays_out_header_lines_and_total() {
        let rendered = ticket().render();

        assert!(rendered.contains("BUDDHA AVENUE"));
        assert!(rendered.contains("Order: #9a5f12cd"));
        assert!(rendered.contains("Time:  15/03/2024 14:30"));
        assert!(rendered.contains("2 x Margherita Pizza"));
        assert!(rendered.contains("₹598.00"));
        assert!(rendered.contains("Thank You! Visit Again"));
        assert!(!rendered.contains("Status:"));
    }

    #[test]
    fn reprints_show_the_stored_status() {
        let mut t = ticket();
        t.status = Some("completed".to_string());
        assert!(t.render().contains("Status: completed"));
    }

    #[test]
    fn reprint_tickets_normalize_the_stored_status_casing() {
        let order: Order = serde_json::from_str(
            r#"{"_id": "64f1c2a9e8b4d7039a5f12cd", "status": "Completed"}"#,
        )
        .unwrap();
        let t = Ticket::for_order("BUDDHA AVENUE", &order);
        assert_eq!(t.status.as_deref(), Some("completed"));
        assert!(t.render().contains("Status: completed"));
    }

    #[tokio::test]
    async fn spooler_prints_the_configured_copy_count() {
        let mut spooler =
            PrintSpooler::new(MemoryPrinter::default(), 2, Duration::from_millis(1));
        spooler.spool(&ticket()).await.unwrap();

        let printed = &spooler.printer().printed;
        assert_eq!(printed.len(), 2);
        assert_eq!(printed[0], printed[1]);
    }
}
