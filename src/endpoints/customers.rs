use crate::cart::CustomerSource;
use crate::client::ApiClient;
use crate::config::CUSTOMERS_PATH;
use crate::error::Result;
use crate::models::Customer;

/// Read-only access to the customer list (`/clientes`).
pub struct CustomerApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CustomerApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<Customer>> {
        self.client.get(CUSTOMERS_PATH, &[])
    }
}

impl CustomerSource for CustomerApi<'_> {
    fn fetch_customers(&self) -> Result<Vec<Customer>> {
        self.list()
    }
}
