//! View state for the catalog pages, kept free of any UI toolkit.

use common::types::SortOrder;

use crate::errors::ClientError;
use crate::form::ProductForm;
use crate::types::{ListParams, Product, ProductPage};

pub const PAGE_SIZE: u64 = 10;
/// The catalog grid is always ordered by price.
pub const CATALOG_SORT: &str = "price";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Loading,
    Ready,
    Error(String),
}

/// Order selector labels as shown next to the search box.
pub fn order_label(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "Lower priced",
        SortOrder::Desc => "Higher priced",
    }
}

/// Catalog listing: search, price order, pagination and the cards on screen.
#[derive(Debug, Clone)]
pub struct CatalogView {
    page: u64,
    order: SortOrder,
    search: String,
    has_next: bool,
    has_previous: bool,
    pub products: Vec<Product>,
    pub status: ViewStatus,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self {
            page: 1,
            order: SortOrder::Asc,
            search: String::new(),
            has_next: false,
            has_previous: false,
            products: Vec::new(),
            status: ViewStatus::Loading,
        }
    }
}

impl CatalogView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Parameters for the next fetch.
    pub fn query(&self) -> ListParams {
        ListParams {
            page: self.page,
            limit: PAGE_SIZE,
            sort: CATALOG_SORT.into(),
            order: self.order,
            search: self.search.clone(),
        }
    }

    pub fn apply(&mut self, page: ProductPage) {
        self.has_next = page.next;
        self.has_previous = page.previous;
        self.products = page.products;
        self.status = ViewStatus::Ready;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = ViewStatus::Error(message.into());
    }

    /// Store a fetch outcome; errors become the inline error state.
    pub fn settle(&mut self, result: Result<ProductPage, ClientError>) {
        match result {
            Ok(page) => self.apply(page),
            Err(_) => self.fail("Error loading products"),
        }
    }

    pub fn can_go_next(&self) -> bool {
        self.has_next
    }

    pub fn can_go_previous(&self) -> bool {
        self.has_previous
    }

    /// Returns whether the page changed.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next {
            return false;
        }
        self.page += 1;
        self.status = ViewStatus::Loading;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous || self.page <= 1 {
            return false;
        }
        self.page -= 1;
        self.status = ViewStatus::Loading;
        true
    }

    pub fn set_order(&mut self, order: SortOrder) {
        if self.order != order {
            self.order = order;
            self.reset_page();
        }
    }

    /// Takes the debounced search term.
    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if self.search != search {
            self.search = search;
            self.reset_page();
        }
    }

    /// Drop a deleted product's card without refetching.
    pub fn remove_local(&mut self, id: i32) {
        self.products.retain(|p| p.id != id);
    }

    fn reset_page(&mut self) {
        self.page = 1;
        self.status = ViewStatus::Loading;
    }
}

/// Single product page with its edit overlay.
#[derive(Debug, Clone, Default)]
pub struct ProductDetailView {
    pub product: Option<Product>,
    pub editing: bool,
    pub status: ViewStatus,
}

impl ProductDetailView {
    pub fn load(&mut self, result: Result<Product, ClientError>) {
        match result {
            Ok(p) => {
                self.product = Some(p);
                self.status = ViewStatus::Ready;
            }
            Err(ClientError::NotFound) => {
                self.product = None;
                self.status = ViewStatus::Error("Product not found".into());
            }
            Err(_) => self.status = ViewStatus::Error("Error loading product".into()),
        }
    }

    pub fn open_edit(&mut self) {
        self.editing = self.product.is_some();
    }

    pub fn close_edit(&mut self) {
        self.editing = false;
    }

    /// Edit form prefilled from the loaded product. A missing discount is
    /// prefilled as 0 and no image is attached.
    pub fn edit_form(&self) -> Option<ProductForm> {
        let p = self.product.as_ref()?;
        Some(ProductForm {
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price.to_string(),
            discounted_price: p.discounted_price.unwrap_or(0.0).to_string(),
            part_number: p.part_number.clone(),
            image: None,
        })
    }

    /// Replace the shown product with the saved one and close the overlay.
    pub fn saved(&mut self, product: Product) {
        self.product = Some(product);
        self.editing = false;
        self.status = ViewStatus::Ready;
    }
}
