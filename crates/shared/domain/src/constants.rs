//! Wire and storage constants shared by the session core and feature slices.

/// Keys of the persisted session record in the credential store.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const TENANT_ID: &str = "tenant_id";
    pub const USER: &str = "user";

    /// Every entry of a persisted session; all of them must be present to restore one.
    pub const SESSION: [&str; 4] = [ACCESS_TOKEN, REFRESH_TOKEN, TENANT_ID, USER];
}

/// Remote authentication endpoints, relative to the API base URL.
pub mod endpoints {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const REFRESH: &str = "/auth/refresh";
    pub const ME: &str = "/auth/me";
    pub const LOGOUT: &str = "/auth/logout";
}

/// Header names stamped on outbound requests.
pub mod headers {
    pub const AUTHORIZATION: &str = "authorization";
    pub const TENANT: &str = "x-tenant-id";
    pub const REQUEST_ID: &str = "x-request-id";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const ACCEPT: &str = "accept";
    pub const JSON: &str = "application/json";
}

/// Names of the built-in feature units.
pub mod modules {
    pub const CORE: &str = "core";
    pub const AUTH: &str = "auth";
    pub const DASHBOARD: &str = "dashboard";
    pub const USER: &str = "user";
    pub const SETTINGS: &str = "settings";
}

/// Well-known routes.
pub mod routes {
    pub const ROOT: &str = "/";
    pub const NOT_FOUND: &str = "/not-found";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const DASHBOARD: &str = "/dashboard";
    pub const PROFILE: &str = "/profile";
    pub const USER_DETAILS: &str = "/users/:id";
    pub const SETTINGS: &str = "/settings";
}
