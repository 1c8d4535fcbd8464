//! # Interactive Sale Session
//!
//! Line-oriented stand-in for the sales screen. Each input line becomes a
//! [`SessionCommand`], which runs one command and prints the result or the
//! notice.
//!
//! ```text
//! list                 products (numbered)
//! add <n|id> [qty]     add product n from the list
//! scan <barcode>       barcode lookup, adds one
//! qty <n> <qty>        set cart line n (0 removes)
//! rm <n>               remove cart line n
//! customers            customers (numbered)
//! customer <n|none>    select a customer
//! pay <cash|card|mpesa>
//! cart                 show cart and totals
//! checkout             complete the sale
//! clear                empty the cart
//! quit
//! ```

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::commands::{cart, sale};
use crate::error::{ApiError, Notice};
use crate::render;
use crate::state::{CartState, CartView, CatalogState, ConfigState};
use karu_core::PosStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    List,
    Add { target: String, quantity: i64 },
    Scan(String),
    Quantity { line: usize, quantity: i64 },
    Remove { line: usize },
    Customers,
    Customer(Option<String>),
    Pay(String),
    Cart,
    Checkout,
    Clear,
    Help,
    Quit,
}

/// Parses one input line. Blank lines give `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (head.to_lowercase().as_str(), args.as_slice()) {
        ("list" | "ls", []) => SessionCommand::List,
        ("add", [target]) => SessionCommand::Add {
            target: target.to_string(),
            quantity: 1,
        },
        ("add", [target, qty]) => SessionCommand::Add {
            target: target.to_string(),
            quantity: number(qty)?,
        },
        ("scan", [code]) => SessionCommand::Scan(code.to_string()),
        ("scan", []) => SessionCommand::Scan(String::new()),
        ("qty", [line, qty]) => SessionCommand::Quantity {
            line: number(line)?,
            quantity: number(qty)?,
        },
        ("rm", [line]) => SessionCommand::Remove {
            line: number(line)?,
        },
        ("customers", []) => SessionCommand::Customers,
        ("customer", ["none"]) => SessionCommand::Customer(None),
        ("customer", [target]) => SessionCommand::Customer(Some(target.to_string())),
        ("pay", [method]) => SessionCommand::Pay(method.to_string()),
        ("cart", []) => SessionCommand::Cart,
        ("checkout", []) => SessionCommand::Checkout,
        ("clear", []) => SessionCommand::Clear,
        ("help" | "?", []) => SessionCommand::Help,
        ("quit" | "exit" | "q", []) => SessionCommand::Quit,
        _ => return Err(format!("Unknown command: {} (try help)", line.trim())),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, String> {
    word.parse().map_err(|_| format!("Not a number: {}", word))
}

/// What the session needs from the rest of the app.
pub struct SaleContext<'a, S> {
    pub store: &'a S,
    pub catalog: &'a CatalogState,
    pub cart: &'a CartState,
    pub config: &'a ConfigState,
}

/// Reads commands until `quit` or end of input.
pub async fn run_sale_session<S, R, W>(
    ctx: &SaleContext<'_, S>,
    input: R,
    out: &mut W,
) -> std::io::Result<()>
where
    S: PosStore,
    ApiError: From<S::Error>,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{} · new sale (help for commands)", ctx.config.store_name)?;
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "{}", msg)?;
                continue;
            }
        };
        debug!(?command, "Session command");

        if command == SessionCommand::Quit {
            break;
        }

        match execute(ctx, command).await {
            Ok(text) => write!(out, "{}", text)?,
            Err(e) => writeln!(out, "{}", e.notice())?,
        }
    }
    Ok(())
}

async fn execute<S>(ctx: &SaleContext<'_, S>, command: SessionCommand) -> Result<String, ApiError>
where
    S: PosStore,
    ApiError: From<S::Error>,
{
    let config = ctx.config;
    let show_cart = |view: CartView| render::cart(&view, config);

    match command {
        SessionCommand::List => Ok(render::products(&ctx.catalog.products(), config)),
        SessionCommand::Add { target, quantity } => {
            let id = product_id(ctx.catalog, &target);
            cart::add_to_cart(ctx.catalog, ctx.cart, &id, quantity).map(show_cart)
        }
        SessionCommand::Scan(code) => Ok(cart::scan_barcode(ctx.catalog, ctx.cart, &code)?
            .map(|n| notice_line(&n))
            .unwrap_or_default()),
        SessionCommand::Quantity { line, quantity } => {
            let id = cart_line_id(ctx.cart, line)?;
            cart::update_cart_item(ctx.cart, &id, quantity).map(show_cart)
        }
        SessionCommand::Remove { line } => {
            let id = cart_line_id(ctx.cart, line)?;
            cart::remove_from_cart(ctx.cart, &id).map(show_cart)
        }
        SessionCommand::Customers => Ok(render::customers(&ctx.catalog.customers(), config)),
        SessionCommand::Customer(target) => {
            let id = target.map(|t| customer_id(ctx.catalog, &t));
            cart::select_customer(ctx.catalog, ctx.cart, id.as_deref()).map(show_cart)
        }
        SessionCommand::Pay(method) => cart::set_payment_method(ctx.cart, &method).map(show_cart),
        SessionCommand::Cart => Ok(show_cart(cart::get_cart(ctx.cart))),
        SessionCommand::Clear => Ok(show_cart(cart::clear_cart(ctx.cart))),
        SessionCommand::Checkout => {
            let outcome = sale::checkout(ctx.store, ctx.cart, ctx.catalog, config).await?;
            Ok(format!(
                "{}{}",
                notice_line(&outcome.notice),
                render::receipt(&outcome.receipt, config)
            ))
        }
        SessionCommand::Help => Ok(HELP.to_string()),
        SessionCommand::Quit => Ok(String::new()),
    }
}

const HELP: &str = "\
list | add <n|id> [qty] | scan <barcode> | qty <n> <qty> | rm <n>
customers | customer <n|none> | pay <cash|card|mpesa>
cart | checkout | clear | quit
";

fn notice_line(notice: &Notice) -> String {
    format!("{}\n", notice)
}

/// A 1-based list position, or the id itself.
fn product_id(catalog: &CatalogState, target: &str) -> String {
    match target.parse::<usize>() {
        Ok(n) if n >= 1 => catalog
            .products()
            .get(n - 1)
            .map(|p| p.id.clone())
            .unwrap_or_else(|| target.to_string()),
        _ => target.to_string(),
    }
}

fn customer_id(catalog: &CatalogState, target: &str) -> String {
    match target.parse::<usize>() {
        Ok(n) if n >= 1 => catalog
            .customers()
            .get(n - 1)
            .map(|c| c.id.clone())
            .unwrap_or_else(|| target.to_string()),
        _ => target.to_string(),
    }
}

fn cart_line_id(cart: &CartState, line: usize) -> Result<String, ApiError> {
    cart.with_session(|s| {
        line.checked_sub(1)
            .and_then(|i| s.cart.lines().get(i))
            .map(|l| l.product_id().to_string())
    })
    .ok_or_else(|| ApiError::cart(format!("No cart line {}", line)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use karu_core::Product;
    use karu_db::{Database, DbConfig};

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(
            parse_line("add 3 2").unwrap(),
            Some(SessionCommand::Add {
                target: "3".to_string(),
                quantity: 2
            })
        );
        assert_eq!(
            parse_line("customer none").unwrap(),
            Some(SessionCommand::Customer(None))
        );
        assert_eq!(parse_line("QUIT").unwrap(), Some(SessionCommand::Quit));
        assert!(parse_line("qty one 2").is_err());
        assert!(parse_line("refund").is_err());
    }

    #[tokio::test]
    async fn test_session_sells_through_stdin_script() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .insert(&Product {
                id: "p-1".to_string(),
                name: "Sugar 1kg".to_string(),
                price_cents: 18_000,
                stock_quantity: 30,
                min_stock_level: 10,
                barcode: Some("6161100440019".to_string()),
                is_active: true,
            })
            .await
            .unwrap();

        let config = ConfigState::default();
        let catalog = CatalogState::new();
        let cart = CartState::new();
        crate::commands::catalog::load_sales_screen(&db, &catalog, &config)
            .await
            .unwrap();

        let ctx = SaleContext {
            store: &db,
            catalog: &catalog,
            cart: &cart,
            config: &config,
        };
        let script: &[u8] = b"scan 6161100440019\nadd 1\nscan 999\ncheckout\nquit\n";
        let mut out = Vec::new();

        run_sale_session(&ctx, script, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Product Added - Sugar 1kg added to cart"));
        assert!(text.contains("Product Not Found"));
        assert!(text.contains("Transaction Successful"));
        assert_eq!(
            db.products().get_by_id("p-1").await.unwrap().unwrap().stock_quantity,
            28
        );
    }
}
