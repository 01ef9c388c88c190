//! HTTP client for the CERCLE REST API.
//!
//! Every endpoint of the service has one method here. Authenticated calls
//! send the stored token as `Authorization: Bearer`; error bodies become
//! [`ClientError::Api`].

use cercle_core::types::DbId;
use chrono::NaiveDate;
use reqwest::{IntoUrl, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::error::{ClientError, ErrorBody};
use crate::session::Session;
use crate::types::*;

pub type ClientResult<T> = Result<T, ClientError>;

/// Typed client for one CERCLE service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the service at `api_url`, e.g. `http://host:8080`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Use the token of a stored session.
    pub fn with_session(mut self, session: Option<&Session>) -> Self {
        self.token = session.map(|s| s.token.clone());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    // ---- auth and profile ----

    /// Sign in and keep the returned token for later calls.
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<Session> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self.send(Method::POST, "/auth/login", Some(&body), false).await?;
        Ok(self.adopt(auth))
    }

    /// Create a member account; the new account is signed in.
    pub async fn register(&mut self, request: &RegisterRequest) -> ClientResult<Session> {
        let auth: AuthResponse = self
            .send(Method::POST, "/auth/register", Some(request), false)
            .await?;
        Ok(self.adopt(auth))
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.get_auth("/user/me").await
    }

    pub async fn update_me(&self, update: &ProfileUpdate) -> ClientResult<User> {
        self.send(Method::PUT, "/user/me", Some(update), true).await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> ClientResult<()> {
        self.send_empty(Method::POST, "/user/change-password", Some(change))
            .await
    }

    // ---- spaces and reservations ----

    pub async fn available_espaces(&self) -> ClientResult<Vec<Espace>> {
        self.get("/public/espaces").await
    }

    pub async fn reserve_space(&self, request: &ReservationRequest) -> ClientResult<Reservation> {
        self.send(Method::POST, "/public/reservations", Some(request), true)
            .await
    }

    pub async fn request_auditorium(
        &self,
        request: &AuditoriumRequest,
    ) -> ClientResult<Reservation> {
        self.send(
            Method::POST,
            "/public/reservations/auditorium",
            Some(request),
            true,
        )
        .await
    }

    /// Pay an approved auditorium reservation.
    pub async fn pay_reservation(
        &self,
        id: DbId,
        payment_intent_id: &str,
    ) -> ClientResult<Reservation> {
        let body = json!({ "paymentIntentId": payment_intent_id });
        self.send(
            Method::POST,
            &format!("/public/reservations/{id}/pay"),
            Some(&body),
            true,
        )
        .await
    }

    pub async fn cancel_reservation(&self, id: DbId) -> ClientResult<()> {
        self.send_empty::<()>(
            Method::DELETE,
            &format!("/public/reservations/{id}/cancel"),
            None,
        )
        .await
    }

    pub async fn my_reservations(&self) -> ClientResult<Vec<Reservation>> {
        self.get_auth("/public/reservations/me").await
    }

    pub async fn user_reservations(&self, user_id: DbId) -> ClientResult<Vec<Reservation>> {
        self.get_auth(&format!("/public/reservations/user/{user_id}"))
            .await
    }

    /// `true` when no booking overlaps the interval.
    pub async fn check_availability(
        &self,
        espace_id: DbId,
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    ) -> ClientResult<bool> {
        let request = self.request(Method::GET, "/public/reservations/check-availability").query(&[
            ("espaceId", espace_id.to_string()),
            ("startDateTime", wire_datetime(start)),
            ("endDateTime", wire_datetime(end)),
        ]);
        parse(request.send().await?).await
    }

    /// Confirmed bookings of a space during `year`/`month`.
    pub async fn espace_calendar(
        &self,
        espace_id: DbId,
        year: i32,
        month: u32,
    ) -> ClientResult<Vec<CalendarReservation>> {
        let request = self
            .request(
                Method::GET,
                &format!("/public/reservations/espace/{espace_id}/calendar"),
            )
            .query(&[("year", year.to_string()), ("month", month.to_string())]);
        parse(request.send().await?).await
    }

    pub async fn espace_day_slots(&self, espace_id: DbId, date: NaiveDate) -> ClientResult<DaySlots> {
        let request = self
            .request(
                Method::GET,
                &format!("/public/reservations/espace/{espace_id}/day-slots"),
            )
            .query(&[("date", date.format("%Y-%m-%d").to_string())]);
        parse(request.send().await?).await
    }

    // ---- events ----

    pub async fn published_events(&self) -> ClientResult<Vec<Event>> {
        self.get("/public/events").await
    }

    pub async fn published_event(&self, id: DbId) -> ClientResult<Event> {
        self.get(&format!("/public/events/{id}")).await
    }

    pub async fn register_to_event(
        &self,
        request: &EventRegistrationRequest,
    ) -> ClientResult<Registration> {
        self.send(Method::POST, "/public/events/register", Some(request), true)
            .await
    }

    pub async fn my_registrations(&self) -> ClientResult<Vec<Registration>> {
        self.get_auth("/public/events/registrations/me").await
    }

    pub async fn cancel_registration(&self, id: DbId) -> ClientResult<()> {
        self.send_empty::<()>(
            Method::DELETE,
            &format!("/public/events/registrations/{id}/cancel"),
            None,
        )
        .await
    }

    // ---- childcare ----

    pub async fn open_garderie_sessions(&self) -> ClientResult<Vec<GarderieSession>> {
        self.get("/public/garderie/sessions").await
    }

    pub async fn book_garderie(
        &self,
        request: &GarderieBookingRequest,
    ) -> ClientResult<GarderieReservation> {
        self.send(
            Method::POST,
            "/public/garderie/reservations",
            Some(request),
            true,
        )
        .await
    }

    pub async fn my_garderie_reservations(&self) -> ClientResult<Vec<GarderieReservation>> {
        self.get_auth("/public/garderie/reservations/me").await
    }

    pub async fn cancel_garderie_reservation(&self, id: DbId) -> ClientResult<()> {
        self.send_empty::<()>(
            Method::DELETE,
            &format!("/public/garderie/reservations/{id}/cancel"),
            None,
        )
        .await
    }

    // ---- organizer ----

    pub async fn submit_event(&self, form: &EventForm) -> ClientResult<Event> {
        self.send(Method::POST, "/organizer/events", Some(form), true)
            .await
    }

    pub async fn my_events(&self) -> ClientResult<Vec<Event>> {
        self.get_auth("/organizer/events/my").await
    }

    pub async fn my_event(&self, id: DbId) -> ClientResult<Event> {
        self.get_auth(&format!("/organizer/events/my/{id}")).await
    }

    pub async fn update_my_event(&self, id: DbId, form: &EventForm) -> ClientResult<Event> {
        self.send(
            Method::PUT,
            &format!("/organizer/events/my/{id}"),
            Some(form),
            true,
        )
        .await
    }

    pub async fn cancel_my_event(&self, id: DbId) -> ClientResult<()> {
        self.send_empty::<()>(Method::DELETE, &format!("/organizer/events/my/{id}"), None)
            .await
    }

    // ---- admin: spaces ----

    pub async fn admin_espaces(&self) -> ClientResult<Vec<Espace>> {
        self.get_auth("/admin/espaces").await
    }

    pub async fn admin_espace(&self, id: DbId) -> ClientResult<Espace> {
        self.get_auth(&format!("/admin/espaces/{id}")).await
    }

    pub async fn create_espace(&self, form: &EspaceForm) -> ClientResult<Espace> {
        self.send(Method::POST, "/admin/espaces", Some(form), true).await
    }

    pub async fn update_espace(&self, id: DbId, form: &EspaceForm) -> ClientResult<Espace> {
        self.send(Method::PUT, &format!("/admin/espaces/{id}"), Some(form), true)
            .await
    }

    pub async fn delete_espace(&self, id: DbId) -> ClientResult<()> {
        self.send_empty::<()>(Method::DELETE, &format!("/admin/espaces/{id}"), None)
            .await
    }

    // ---- admin: events ----

    pub async fn admin_events(&self) -> ClientResult<Vec<Event>> {
        self.get_auth("/admin/events").await
    }

    pub async fn admin_pending_events(&self) -> ClientResult<Vec<Event>> {
        self.get_auth("/admin/events/pending").await
    }

    pub async fn admin_event(&self, id: DbId) -> ClientResult<Event> {
        self.get_auth(&format!("/admin/events/{id}")).await
    }

    pub async fn admin_create_event(&self, form: &EventForm) -> ClientResult<Event> {
        self.send(Method::POST, "/admin/events", Some(form), true).await
    }

    pub async fn admin_update_event(&self, id: DbId, form: &EventForm) -> ClientResult<Event> {
        self.send(Method::PUT, &format!("/admin/events/{id}"), Some(form), true)
            .await
    }

    pub async fn admin_delete_event(&self, id: DbId) -> ClientResult<()> {
        self.send_empty::<()>(Method::DELETE, &format!("/admin/events/{id}"), None)
            .await
    }

    pub async fn decide_event(&self, id: DbId, decision: &Decision) -> ClientResult<Event> {
        self.send(
            Method::POST,
            &format!("/admin/events/{id}/approve"),
            Some(decision),
            true,
        )
        .await
    }

    /// Force an event status, e.g. `CANCELLED`.
    pub async fn set_event_status(&self, id: DbId, status: &str) -> ClientResult<Event> {
        let request = self
            .authorized(Method::PATCH, &format!("/admin/events/{id}/status"))?
            .query(&[("status", status)]);
        parse(request.send().await?).await
    }

    // ---- admin: childcare sessions ----

    pub async fn admin_garderie_sessions(&self) -> ClientResult<Vec<GarderieSession>> {
        self.get_auth("/admin/garderie/sessions").await
    }

    pub async fn admin_garderie_session(&self, id: DbId) -> ClientResult<GarderieSession> {
        self.get_auth(&format!("/admin/garderie/sessions/{id}")).await
    }

    pub async fn create_garderie_session(
        &self,
        form: &GarderieSessionForm,
    ) -> ClientResult<GarderieSession> {
        self.send(Method::POST, "/admin/garderie/sessions", Some(form), true)
            .await
    }

    pub async fn update_garderie_session(
        &self,
        id: DbId,
        form: &GarderieSessionForm,
    ) -> ClientResult<GarderieSession> {
        self.send(
            Method::PUT,
            &format!("/admin/garderie/sessions/{id}"),
            Some(form),
            true,
        )
        .await
    }

    pub async fn delete_garderie_session(&self, id: DbId) -> ClientResult<()> {
        self.send_empty::<()>(
            Method::DELETE,
            &format!("/admin/garderie/sessions/{id}"),
            None,
        )
        .await
    }

    // ---- admin: bookings ----

    pub async fn admin_all_bookings(&self) -> ClientResult<Vec<AdminBooking>> {
        self.get_auth("/admin/reservations/all").await
    }

    pub async fn admin_space_reservations(&self) -> ClientResult<Vec<AdminSpaceReservation>> {
        self.get_auth("/admin/reservations/spaces").await
    }

    pub async fn admin_event_registrations(&self) -> ClientResult<Vec<AdminEventRegistration>> {
        self.get_auth("/admin/reservations/events").await
    }

    pub async fn admin_garderie_reservations(
        &self,
    ) -> ClientResult<Vec<AdminGarderieReservation>> {
        self.get_auth("/admin/reservations/childcare").await
    }

    /// Space bookings in the merged row format.
    pub async fn admin_space_bookings(&self) -> ClientResult<Vec<AdminBooking>> {
        self.get_auth("/admin/reservations/espaces").await
    }

    /// Childcare bookings in the merged row format.
    pub async fn admin_garderie_bookings(&self) -> ClientResult<Vec<AdminBooking>> {
        self.get_auth("/admin/reservations/garderie").await
    }

    pub async fn admin_pending_reservations(&self) -> ClientResult<Vec<Reservation>> {
        self.get_auth("/admin/reservations/pending").await
    }

    pub async fn admin_reservation(&self, id: DbId) -> ClientResult<Reservation> {
        self.get_auth(&format!("/admin/reservations/{id}")).await
    }

    pub async fn decide_reservation(
        &self,
        id: DbId,
        decision: &Decision,
    ) -> ClientResult<Reservation> {
        self.send(
            Method::POST,
            &format!("/admin/reservations/{id}/approve"),
            Some(decision),
            true,
        )
        .await
    }

    // ---- admin: users and stats ----

    pub async fn admin_users(&self) -> ClientResult<Vec<User>> {
        self.get_auth("/admin/users").await
    }

    pub async fn admin_user(&self, id: DbId) -> ClientResult<User> {
        self.get_auth(&format!("/admin/users/{id}")).await
    }

    pub async fn set_user_role(&self, id: DbId, role: &str) -> ClientResult<User> {
        let body = json!({ "role": role });
        self.send(Method::PUT, &format!("/admin/users/{id}/role"), Some(&body), true)
            .await
    }

    pub async fn set_user_status(&self, id: DbId, status: &str) -> ClientResult<User> {
        let body = json!({ "status": status });
        self.send(
            Method::PUT,
            &format!("/admin/users/{id}/status"),
            Some(&body),
            true,
        )
        .await
    }

    pub async fn stats(&self) -> ClientResult<Stats> {
        self.get_auth("/admin/stats").await
    }

    // ---- payments ----

    pub async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> ClientResult<PaymentIntent> {
        self.send(
            Method::POST,
            "/payments/create-payment-intent",
            Some(request),
            false,
        )
        .await
    }

    /// Check a payment. A failed check is returned as a [`PaymentCheck`]
    /// with `success: false`, not as an error.
    pub async fn verify_payment(&self, payment_intent_id: &str) -> ClientResult<PaymentCheck> {
        let url = self.url_with_segment("/payments/verify", payment_intent_id)?;
        let response = self.request_url(Method::GET, url).send().await?;
        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|_| ClientError::Api {
                status: 400,
                message: ErrorBody::message_from(&body, 400),
            });
        }
        parse(response).await
    }

    // ---- private helpers ----

    fn adopt(&mut self, auth: AuthResponse) -> Session {
        tracing::debug!(user_id = auth.user.id, "Signed in");
        self.token = Some(auth.token.clone());
        Session {
            user: auth.user,
            token: auth.token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.api_url, path)
    }

    /// `path` followed by `segment`, percent-encoded as one path segment.
    fn url_with_segment(&self, path: &str, segment: &str) -> ClientResult<Url> {
        let mut url =
            Url::parse(&self.url(path)).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.api_url.clone()))?
            .push(segment);
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_url(method, self.url(path))
    }

    fn request_url(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// A request that requires a session.
    fn authorized(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        if self.token.is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        Ok(self.request(method, path))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        parse(self.request(Method::GET, path).send().await?).await
    }

    async fn get_auth<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        parse(self.authorized(Method::GET, path)?.send().await?).await
    }

    async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: bool,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = if auth {
            self.authorized(method, path)?
        } else {
            self.request(method, path)
        };
        if let Some(body) = body {
            request = request.json(body);
        }
        parse(request.send().await?).await
    }

    /// Authenticated call whose success body is ignored (204 responses).
    async fn send_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.authorized(method, path)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        ensure_success(request.send().await?).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into [`ClientError::Api`] with the service's message.
async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = ErrorBody::message_from(&body, status.as_u16());
    tracing::debug!(status = status.as_u16(), %message, "API call failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

fn wire_datetime(dt: chrono::NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}
