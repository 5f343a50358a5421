use crate::api::CalendarsApi;
use crate::client::{require, HttpClient};
use crate::context::Context;
use crate::envelope::Page;
use crate::error::{Error, Result};
use crate::models::{Calendar, CalendarRequest, Event, EventQuery, EventRequest};
use async_trait::async_trait;
use serde::Serialize;

/// Events are addressed per calendar.
#[derive(Serialize)]
struct CalendarScope<'a> {
    calendar_id: &'a str,
}

#[async_trait]
impl CalendarsApi for HttpClient {
    async fn list_calendars(&self, ctx: &Context, grant_id: &str) -> Result<Vec<Calendar>> {
        let url = self.grant_url(grant_id, &["calendars"])?;
        self.fetch_all(ctx, url).await
    }

    async fn get_calendar(&self, ctx: &Context, grant_id: &str, calendar_id: &str) -> Result<Calendar> {
        let calendar_id = require("calendar_id", calendar_id)?;
        let url = self.grant_url(grant_id, &["calendars", calendar_id])?;
        self.get_with_not_found(ctx, url, Error::not_found("calendar", calendar_id))
            .await
    }

    async fn create_calendar(&self, ctx: &Context, grant_id: &str, request: &CalendarRequest) -> Result<Calendar> {
        let url = self.grant_url(grant_id, &["calendars"])?;
        self.create(ctx, url, request).await
    }

    async fn update_calendar(
        &self,
        ctx: &Context,
        grant_id: &str,
        calendar_id: &str,
        request: &CalendarRequest,
    ) -> Result<Calendar> {
        let calendar_id = require("calendar_id", calendar_id)?;
        let url = self.grant_url(grant_id, &["calendars", calendar_id])?;
        self.update(ctx, url, request).await
    }

    async fn delete_calendar(&self, ctx: &Context, grant_id: &str, calendar_id: &str) -> Result<()> {
        let calendar_id = require("calendar_id", calendar_id)?;
        let url = self.grant_url(grant_id, &["calendars", calendar_id])?;
        self.remove(ctx, url).await
    }

    async fn list_events(&self, ctx: &Context, grant_id: &str, query: &EventQuery) -> Result<Page<Event>> {
        require("calendar_id", &query.calendar_id)?;
        let url = self.grant_url_with_query(grant_id, &["events"], query)?;
        self.fetch_page(ctx, url).await
    }

    async fn get_event(&self, ctx: &Context, grant_id: &str, calendar_id: &str, event_id: &str) -> Result<Event> {
        let calendar_id = require("calendar_id", calendar_id)?;
        let event_id = require("event_id", event_id)?;
        let url = self.grant_url_with_query(grant_id, &["events", event_id], &CalendarScope { calendar_id })?;
        self.get_with_not_found(ctx, url, Error::not_found("event", event_id))
            .await
    }

    async fn create_event(
        &self,
        ctx: &Context,
        grant_id: &str,
        calendar_id: &str,
        request: &EventRequest,
    ) -> Result<Event> {
        let calendar_id = require("calendar_id", calendar_id)?;
        let url = self.grant_url_with_query(grant_id, &["events"], &CalendarScope { calendar_id })?;
        self.create(ctx, url, request).await
    }

    async fn update_event(
        &self,
        ctx: &Context,
        grant_id: &str,
        calendar_id: &str,
        event_id: &str,
        request: &EventRequest,
    ) -> Result<Event> {
        let calendar_id = require("calendar_id", calendar_id)?;
        let event_id = require("event_id", event_id)?;
        let url = self.grant_url_with_query(grant_id, &["events", event_id], &CalendarScope { calendar_id })?;
        self.update(ctx, url, request).await
    }

    async fn delete_event(&self, ctx: &Context, grant_id: &str, calendar_id: &str, event_id: &str) -> Result<()> {
        let calendar_id = require("calendar_id", calendar_id)?;
        let event_id = require("event_id", event_id)?;
        let url = self.grant_url_with_query(grant_id, &["events", event_id], &CalendarScope { calendar_id })?;
        self.remove(ctx, url).await
    }
}
