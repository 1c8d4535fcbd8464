//! # Commands
//!
//! One function per cashier action. Commands are generic over
//! [`karu_core::PosStore`], so the same code runs against the local
//! database, the hosted backend, or a test double.
//!
//! | Module      | Commands                                              |
//! |-------------|-------------------------------------------------------|
//! | `catalog`   | load_sales_screen, refresh_products, list_*           |
//! | `cart`      | add_to_cart, scan_barcode, update/remove/clear, select_customer, set_payment_method |
//! | `sale`      | checkout                                              |
//! | `dashboard` | load_dashboard                                        |

pub mod cart;
pub mod catalog;
pub mod dashboard;
pub mod sale;
