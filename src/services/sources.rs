use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::clients::gym::{GymClient, ResourceKind};
use crate::clients::models::common::{PageOutcome, PageRequest};
use crate::clients::models::responses::{Category, Exercise, Meal};
use crate::error::Result;
use crate::services::pagination::PageSource;

/// Pages of one API resource, fetched through [`GymClient::search`].
pub struct ResourceSource<T> {
    client: GymClient,
    kind: ResourceKind,
    _item: PhantomData<fn() -> T>,
}

impl<T> ResourceSource<T> {
    pub fn new(client: GymClient, kind: ResourceKind) -> Self {
        Self {
            client,
            kind,
            _item: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn client(&self) -> &GymClient {
        &self.client
    }
}

pub fn categories(client: GymClient) -> ResourceSource<Category> {
    ResourceSource::new(client, ResourceKind::Categories)
}

pub fn exercises(client: GymClient) -> ResourceSource<Exercise> {
    ResourceSource::new(client, ResourceKind::Exercises)
}

pub fn meals(client: GymClient) -> ResourceSource<Meal> {
    ResourceSource::new(client, ResourceKind::Meals)
}

#[async_trait]
impl<T> PageSource for ResourceSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Item = T;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageOutcome<T>> {
        let outcome = self.client.search(self.kind, request).await?;
        tracing::trace!(
            resource = self.kind.array_key(),
            page = request.page,
            count = outcome.count(),
            "gym.search.response"
        );
        Ok(outcome)
    }
}

/// A source backed by an async closure.
pub struct FnSource<F, T> {
    fetch: F,
    _item: PhantomData<fn() -> T>,
}

impl<F, Fut, T> FnSource<F, T>
where
    F: Fn(PageRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageOutcome<T>>> + Send + 'static,
    T: Send,
{
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut, T> PageSource for FnSource<F, T>
where
    F: Fn(PageRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageOutcome<T>>> + Send + 'static,
    T: Send,
{
    type Item = T;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageOutcome<T>> {
        (self.fetch)(request.clone()).await
    }
}

/// Applies an item mapper to everything another source returns.
pub struct Mapped<S, F> {
    inner: S,
    map: F,
}

pub trait PageSourceExt: PageSource + Sized {
    fn map_items<U, F>(self, map: F) -> Mapped<Self, F>
    where
        F: Fn(Self::Item) -> U + Send + Sync,
    {
        Mapped { inner: self, map }
    }
}

impl<S: PageSource> PageSourceExt for S {}

#[async_trait]
impl<S, F, U> PageSource for Mapped<S, F>
where
    S: PageSource,
    F: Fn(S::Item) -> U + Send + Sync,
    U: Send,
{
    type Item = U;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageOutcome<U>> {
        Ok(match self.inner.fetch_page(request).await? {
            PageOutcome::Items(items) => {
                PageOutcome::Items(items.into_iter().map(&self.map).collect())
            }
            PageOutcome::Empty => PageOutcome::Empty,
        })
    }
}
