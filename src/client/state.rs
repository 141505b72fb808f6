//! 客户端视图状态
//!
//! 所有界面状态集中在 `ViewState` 中，由 `CatalogClient` 按 `Action` 单向更新：
//! 动作 → 调用服务端 → 整体重新拉取列表 → 重新渲染。

use tracing::{error, info};

use super::api::CatalogApi;
use super::error::ClientError;
use crate::app::catalog::model::{NewProduct, Product};

/// 购买（删除）前的确认提示
pub const BUY_PROMPT: &str = "Buy this item?";

/// 本地缓存的加载状态
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Empty,
    Loading,
    Populated,
    /// 拉取失败；`ViewState::products` 仍保留上一次成功的数据
    Error(String),
}

/// 上架表单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub description: String,
}

impl ProductForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// 名称与价格必须非空，价格必须是数字；名称按原样提交
    pub fn to_new_product(&self) -> Result<NewProduct, ClientError> {
        if self.name.is_empty() {
            return Err(ClientError::Validation("product name is required".to_string()));
        }

        let price = self.price.trim();
        if price.is_empty() {
            return Err(ClientError::Validation("price is required".to_string()));
        }
        let price = price
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ClientError::Validation(format!("price {:?} is not a number", price)))?;

        let description = self.description.trim();
        let description = (!description.is_empty()).then(|| description.to_string());

        Ok(NewProduct::new(self.name.as_str(), price, description))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub products: Vec<Product>,
    pub status: LoadStatus,
    pub form: ProductForm,
    /// 最近一次失败操作的错误信息
    pub last_error: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            status: LoadStatus::Empty,
            form: ProductForm::default(),
            last_error: None,
        }
    }
}

/// 用户动作
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Refresh,
    EditName(String),
    EditPrice(String),
    EditDescription(String),
    Submit,
    RequestRemoval(i64),
}

/// 动作执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Refreshed,
    Edited,
    Submitted(Product),
    Removed(i64),
    /// 用户取消了购买确认，未发出请求
    Declined,
}

/// 用户确认
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct CatalogClient<A, C> {
    api: A,
    confirm: C,
    state: ViewState,
}

impl<A, C> CatalogClient<A, C>
where
    A: CatalogApi,
    C: Confirm,
{
    pub fn new(api: A, confirm: C) -> Self {
        Self {
            api,
            confirm,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn dispatch(&mut self, action: Action) -> Result<Outcome, ClientError> {
        match action {
            Action::Refresh => self.refresh().await.map(|_| Outcome::Refreshed),
            Action::EditName(name) => {
                self.state.form.name = name;
                Ok(Outcome::Edited)
            }
            Action::EditPrice(price) => {
                self.state.form.price = price;
                Ok(Outcome::Edited)
            }
            Action::EditDescription(description) => {
                self.state.form.description = description;
                Ok(Outcome::Edited)
            }
            Action::Submit => self.submit().await.map(Outcome::Submitted),
            Action::RequestRemoval(id) => self.request_removal(id).await,
        }
    }

    /// 拉取完整列表并整体替换本地缓存
    ///
    /// 请求期间旧数据保持可见；失败时缓存不变。
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.state.status = LoadStatus::Loading;

        match self.api.list().await {
            Ok(products) => {
                self.state.products = products;
                self.state.status = LoadStatus::Populated;
                self.state.last_error = None;
                Ok(())
            }
            Err(err) => {
                error!("获取商品列表失败: {}", err);
                self.state.status = LoadStatus::Error(err.to_string());
                self.state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// 提交上架表单
    ///
    /// 成功后清空表单并刷新；失败时保留表单内容以便重试。
    pub async fn submit(&mut self) -> Result<Product, ClientError> {
        let new_product = match self.state.form.to_new_product() {
            Ok(new_product) => new_product,
            Err(err) => return Err(self.report(err)),
        };

        let created = match self.api.create(&new_product).await {
            Ok(created) => created,
            Err(err) => return Err(self.report(err)),
        };
        info!("商品已上架: id={}", created.id);

        self.state.form.clear();
        // 刷新失败已记录在状态里，不影响本次上架结果
        self.refresh().await.ok();

        Ok(created)
    }

    /// 填写表单后立即提交
    pub async fn submit_with(
        &mut self,
        name: &str,
        price: &str,
        description: Option<&str>,
    ) -> Result<Product, ClientError> {
        self.state.form = ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            description: description.unwrap_or_default().to_string(),
        };
        self.submit().await
    }

    /// 购买（删除）商品
    ///
    /// 需要用户确认；无论删除成功与否都会刷新，以反映服务端的真实状态。
    pub async fn request_removal(&mut self, id: i64) -> Result<Outcome, ClientError> {
        if !self.confirm.confirm(BUY_PROMPT) {
            return Ok(Outcome::Declined);
        }

        let result = self.api.delete(id).await;
        self.refresh().await.ok();

        match result {
            Ok(_) => {
                info!("商品已购买: id={}", id);
                Ok(Outcome::Removed(id))
            }
            Err(err) => Err(self.report(err)),
        }
    }

    fn report(&mut self, err: ClientError) -> ClientError {
        error!("{}", err);
        self.state.last_error = Some(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::response::MessageResponse;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeApi {
        products: Mutex<Vec<Product>>,
        last_id: Mutex<i64>,
        calls: Mutex<Vec<String>>,
        fail_list: AtomicBool,
        fail_create: AtomicBool,
        fail_delete: AtomicBool,
        stall_list: AtomicBool,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn seed(&self, name: &str, price: f64) -> Product {
            let mut last_id = self.last_id.lock().unwrap();
            *last_id += 1;
            let product = Product {
                id: *last_id,
                name: name.to_string(),
                price,
                description: None,
            };
            self.products.lock().unwrap().push(product.clone());
            product
        }

        fn failure() -> ClientError {
            ClientError::Status {
                status: 500,
                body: "storage is unavailable".to_string(),
            }
        }
    }

    #[async_trait]
    impl CatalogApi for FakeApi {
        async fn list(&self) -> Result<Vec<Product>, ClientError> {
            self.record("list");
            if self.stall_list.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(Self::failure());
            }
            Ok(self.products.lock().unwrap().clone())
        }

        async fn create(&self, product: &NewProduct) -> Result<Product, ClientError> {
            self.record("create");
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(Self::failure());
            }
            let mut created = self.seed(&product.name, product.price);
            created.description = product.description.clone();
            Ok(created)
        }

        async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError> {
            self.record(format!("delete {id}"));
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(Self::failure());
            }
            self.products.lock().unwrap().retain(|p| p.id != id);
            Ok(MessageResponse::new("Product removed"))
        }
    }

    fn client(confirmed: bool) -> CatalogClient<FakeApi, impl Confirm> {
        CatalogClient::new(FakeApi::default(), move |_: &str| confirmed)
    }

    #[tokio::test]
    async fn refresh_populates_and_replaces_cache() {
        let mut client = client(true);
        assert_eq!(client.state().status, LoadStatus::Empty);

        client.api().seed("Pen", 10.0);
        client.refresh().await.unwrap();
        assert_eq!(client.state().status, LoadStatus::Populated);
        assert_eq!(client.state().products.len(), 1);

        client.api().products.lock().unwrap().clear();
        client.refresh().await.unwrap();
        assert!(client.state().products.is_empty());
        assert_eq!(client.state().status, LoadStatus::Populated);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_products() {
        let mut client = client(true);
        client.api().seed("Pen", 10.0);
        client.refresh().await.unwrap();

        client.api().fail_list.store(true, Ordering::SeqCst);
        assert!(client.refresh().await.is_err());

        assert!(matches!(client.state().status, LoadStatus::Error(_)));
        assert_eq!(client.state().products.len(), 1);
        assert!(client.state().last_error.is_some());
    }

    #[tokio::test]
    async fn refresh_shows_loading_while_request_is_in_flight() {
        let mut client = client(true);
        client.api().seed("Pen", 10.0);
        client.refresh().await.unwrap();

        client.api().stall_list.store(true, Ordering::SeqCst);
        let in_flight = tokio::time::timeout(Duration::from_millis(50), client.refresh()).await;
        assert!(in_flight.is_err());

        assert_eq!(client.state().status, LoadStatus::Loading);
        assert_eq!(client.state().products.len(), 1);
    }

    #[tokio::test]
    async fn first_refresh_moves_from_empty_to_loading() {
        let mut client = client(true);
        client.api().stall_list.store(true, Ordering::SeqCst);

        assert_eq!(client.state().status, LoadStatus::Empty);
        let in_flight = tokio::time::timeout(Duration::from_millis(50), client.refresh()).await;
        assert!(in_flight.is_err());
        assert_eq!(client.state().status, LoadStatus::Loading);
        assert!(client.state().products.is_empty());
    }

    #[tokio::test]
    async fn names_are_sent_as_typed() {
        let mut client = client(true);

        let blank = client.submit_with("   ", "5", None).await.unwrap();
        assert_eq!(blank.name, "   ");

        let padded = client.submit_with("  Blue Pen  ", "5", None).await.unwrap();
        assert_eq!(padded.name, "  Blue Pen  ");
        assert_eq!(client.api().calls(), vec!["create", "list", "create", "list"]);
    }

    #[tokio::test]
    async fn submit_with_empty_fields_sends_nothing() {
        let mut client = client(true);

        let err = client.submit_with("", "", None).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let err = client.submit_with("Pen", "  ", None).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let err = client.submit_with("Pen", "ten", None).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        assert!(client.api().calls().is_empty());
        assert_eq!(client.state().form.name, "Pen");
    }

    #[tokio::test]
    async fn successful_submit_clears_form_and_refetches() {
        let mut client = client(true);

        let created = client.submit_with("Pen", "10", None).await.unwrap();
        assert_eq!(created.price, 10.0);
        assert_eq!(created.description, None);

        assert_eq!(client.state().form, ProductForm::default());
        assert_eq!(client.state().products, vec![created]);
        assert_eq!(client.api().calls(), vec!["create", "list"]);
    }

    #[tokio::test]
    async fn failed_submit_keeps_form_for_retry() {
        let mut client = client(true);
        client.api().fail_create.store(true, Ordering::SeqCst);

        assert!(client.submit_with("Pen", "10", Some("blue")).await.is_err());

        let form = &client.state().form;
        assert_eq!(form.name, "Pen");
        assert_eq!(form.price, "10");
        assert_eq!(form.description, "blue");
        assert_eq!(client.api().calls(), vec!["create"]);
        assert!(client.state().last_error.is_some());
    }

    #[tokio::test]
    async fn declined_removal_sends_nothing() {
        let mut client = client(false);
        let product = client.api().seed("Pen", 10.0);

        let outcome = client.request_removal(product.id).await.unwrap();
        assert_eq!(outcome, Outcome::Declined);
        assert!(client.api().calls().is_empty());
    }

    #[tokio::test]
    async fn removal_refetches_after_delete() {
        let mut client = client(true);
        let first = client.api().seed("Pen", 10.0);
        let second = client.api().seed("Ink", 4.0);

        let outcome = client.request_removal(first.id).await.unwrap();
        assert_eq!(outcome, Outcome::Removed(first.id));
        assert_eq!(client.state().products, vec![second]);
        assert_eq!(
            client.api().calls(),
            vec![format!("delete {}", first.id), "list".to_string()]
        );
    }

    #[tokio::test]
    async fn failed_removal_still_resyncs() {
        let mut client = client(true);
        let product = client.api().seed("Pen", 10.0);
        client.api().fail_delete.store(true, Ordering::SeqCst);

        assert!(client.request_removal(product.id).await.is_err());

        assert_eq!(client.state().status, LoadStatus::Populated);
        assert_eq!(client.state().products, vec![product]);
        assert!(client.state().last_error.is_some());
    }

    #[tokio::test]
    async fn dispatch_drives_the_form() {
        let mut client = client(true);

        client.dispatch(Action::EditName("Lamp".to_string())).await.unwrap();
        client.dispatch(Action::EditPrice("25.5".to_string())).await.unwrap();
        client
            .dispatch(Action::EditDescription("desk lamp".to_string()))
            .await
            .unwrap();

        let outcome = client.dispatch(Action::Submit).await.unwrap();
        match outcome {
            Outcome::Submitted(product) => {
                assert_eq!(product.name, "Lamp");
                assert_eq!(product.description.as_deref(), Some("desk lamp"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(client.state().products.len(), 1);
    }
}
