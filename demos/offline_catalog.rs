//! Offline catalog example
//!
//! Points the query service at a server that is not running and shows that
//! every query still resolves, served from the offline product set:
//! - A first page at the configured page size
//! - A filtered and sorted query built with a filter set
//! - A page past the end
//!
//! Run with `RUST_LOG=catalog_query=debug` to see the resolution phases.

use anyhow::Result;
use catalog_query::prelude::*;
use tracing_subscriber::EnvFilter;

fn print_page(title: &str, query: &Query, page: &ResultPage) {
    let meta = page.meta(query);
    println!(
        "\n📦 {} ({:?}, page {}/{}, {} matching)",
        title, page.source, meta.page, meta.total_pages, page.total
    );
    for tagged in page.tagged(query) {
        let product = tagged.product;
        let stock = if product.is_in_stock() {
            format!("stok {:>3}", product.stock)
        } else {
            "tükendi".to_string()
        };
        println!(
            "   {:<22} {:<14} {:>9.2} TL  {:<8}  [{}]",
            product.name,
            product.category,
            product.price,
            stock,
            tagged.page_tag()
        );
    }
    if page.is_empty() {
        println!("   (no products on this page)");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🛒 Catalog Query Offline Example");
    println!("================================");

    let config = CatalogConfig::from_yaml_str(
        r#"
remote:
  base_url: http://127.0.0.1:9
  timeout_ms: 500
default_page_size: 5
"#,
    )?;
    let service = ProductQueryService::from_config(&config);
    println!("🌐 Remote collection: {}", config.remote.collection_url());

    let query = config.first_page();
    let page = service.resolve(&query).await;
    print_page("First page", &query, &page);

    let filters = FilterSet::new()
        .with(Filter::greater_than("stock", "10"))
        .with(Filter::new("category", "neq", "Giyim"))
        .with_search("ürün 1");
    let query = config
        .first_page()
        .sorted_by(SortKey::parse("price:desc"))
        .with_filter_set(filters);
    let page = service.resolve(&query).await;
    print_page("In stock, not clothing, named 'ürün 1', priciest first", &query, &page);

    let query = config.first_page().at_page(99);
    let page = service.resolve(&query).await;
    print_page("Page 99", &query, &page);

    Ok(())
}
