use catalog_engine::{PaginationState, Status};
use catalog_types::Product;
use std::fmt::Write;

/// One-screen text rendering of a state snapshot.
pub fn render_state(state: &PaginationState) -> String {
    let mut out = String::new();
    match state.status {
        Status::Idle => out.push_str("(nothing loaded yet)"),
        Status::Loading => out.push_str("loading..."),
        Status::Error => {
            let detail = state.error_detail.as_deref().unwrap_or("unknown error");
            let _ = write!(out, "error: {detail}");
        }
        Status::Ready => {
            let _ = write!(
                out,
                "page {}/{} ({} products)",
                state.current_page, state.total_pages, state.total_count
            );
            if state.results.is_empty() {
                out.push_str("\n  no products");
            }
            for product in &state.results {
                let _ = write!(
                    out,
                    "\n  {:<8} {:<28} {:>10.2}  {}",
                    product.id.as_str(),
                    product.name,
                    product.price,
                    product.category
                );
            }
            let prev = if state.has_previous() { "[prev]" } else { "" };
            let next = if state.has_next() { "[next]" } else { "" };
            if !prev.is_empty() || !next.is_empty() {
                let _ = write!(out, "\n  {prev} {next}");
            }
        }
    }
    out
}

/// Detail view of a single product.
pub fn render_product(product: &Product) -> String {
    let mut out = format!(
        "{} ({})\n  price:    {:.2}\n  category: {}\n  stock:    {}",
        product.name, product.id, product.price, product.category, product.stock
    );
    if let Some(description) = &product.description {
        let _ = write!(out, "\n  {description}");
    }
    if !product.in_stock() {
        out.push_str("\n  out of stock");
    }
    out
}
