//! Plain-text layouts for the terminal screens.

use std::fmt::Write;

use crate::commands::dashboard::Dashboard;
use crate::commands::sale::Receipt;
use crate::state::{CartView, ConfigState};
use karu_core::{Customer, Product};

const RULE: &str = "────────────────────────────────────────────────";

pub fn products(list: &[Product], config: &ConfigState) -> String {
    let mut out = String::new();
    if list.is_empty() {
        out.push_str("No products available\n");
        return out;
    }
    for (i, p) in list.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<28} {:>10}  stock {:>4}  {}",
            i + 1,
            p.name,
            config.format_currency(p.price()),
            p.stock_quantity,
            p.barcode.as_deref().unwrap_or("")
        );
    }
    out
}

pub fn customers(list: &[Customer], config: &ConfigState) -> String {
    let mut out = String::new();
    if list.is_empty() {
        out.push_str("No customers\n");
        return out;
    }
    for (i, c) in list.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<24} {:<12} {:>5} pts  spent {}{}",
            i + 1,
            c.name,
            c.phone,
            c.loyalty_points,
            config.format_currency(c.total_spent()),
            if c.is_student { "  [student]" } else { "" }
        );
    }
    out
}

pub fn cart(view: &CartView, config: &ConfigState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "CART{:>44}",
        format!("{} items, {} units", view.lines.len(), view.total_quantity)
    );
    let _ = writeln!(out, "{}", RULE);

    if view.lines.is_empty() {
        out.push_str("Cart is empty\n");
    }
    for (i, line) in view.lines.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<24} x{:<4} {:>12}",
            i + 1,
            line.product.name,
            line.quantity,
            config.format_currency(line.line_total())
        );
    }

    let p = &view.pricing;
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Subtotal{:>40}", config.format_currency(p.subtotal));
    let _ = writeln!(out, "Tax (16%){:>39}", config.format_currency(p.tax));
    if p.has_discount() {
        let _ = writeln!(
            out,
            "Student discount (10%){:>26}",
            format!("-{}", config.format_currency(p.discount))
        );
    }
    let _ = writeln!(out, "TOTAL{:>43}", config.format_currency(p.total));

    match &view.customer {
        Some(c) => {
            let _ = writeln!(
                out,
                "Customer: {} ({} pts){}",
                c.name,
                c.loyalty_points,
                if c.is_student { ", student discount applies" } else { "" }
            );
        }
        None => out.push_str("Customer: walk-in\n"),
    }
    if let Some(points) = view.points_to_earn {
        let _ = writeln!(out, "Points to earn: {}", points);
    }
    let _ = writeln!(out, "Payment: {}", view.payment_method);
    out
}

pub fn receipt(r: &Receipt, config: &ConfigState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", r.store_name);
    let _ = writeln!(out, "{}", r.transaction_number);
    let _ = writeln!(out, "{}", r.timestamp.format("%Y-%m-%d %H:%M"));
    let _ = writeln!(out, "Cashier: {}", r.cashier_name);
    let _ = writeln!(out, "{}", RULE);
    for item in &r.items {
        let _ = writeln!(
            out,
            "{:<28} {:>3} x {:>10}",
            item.name,
            item.quantity,
            config.format_currency(karu_core::Money::from_cents(item.unit_price_cents))
        );
    }
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Total{:>43}", config.format_currency(r.pricing.total));
    let _ = writeln!(out, "Paid by {}", r.payment_method);
    if let (Some(name), Some(balance)) = (&r.customer_name, r.loyalty_balance) {
        let _ = writeln!(
            out,
            "{} earned {} pts, balance {}",
            name, r.pricing.points_earned, balance
        );
    }
    out
}

pub fn dashboard(d: &Dashboard, config: &ConfigState) -> String {
    let s = &d.stats;
    let mut out = String::new();
    let _ = writeln!(out, "{}  ·  {}", config.store_name, d.greeting);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Today's sales        {}", config.format_currency(s.today_sales));
    let _ = writeln!(out, "Total revenue        {}", config.format_currency(s.total_revenue));
    let _ = writeln!(out, "Transactions         {}", s.total_transactions);
    let _ = writeln!(out, "Customers            {}", s.total_customers);
    let _ = writeln!(out, "Low stock items      {}", s.low_stock.total);
    let _ = writeln!(out, "Top seller           {}", s.top_selling_product);
    let _ = writeln!(out, "Average sale         {}", config.format_currency(s.average_sale));

    if !s.low_stock.is_empty() {
        let _ = writeln!(out, "{}", RULE);
        out.push_str("Low stock\n");
        for p in &s.low_stock.preview {
            let _ = writeln!(
                out,
                "  {:<28} {} left (min {})",
                p.name, p.stock_quantity, p.min_stock_level
            );
        }
        if s.low_stock.remaining > 0 {
            let _ = writeln!(out, "  +{} more", s.low_stock.remaining);
        }
    }
    out
}
