use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Initial form values. A field missing from a request takes these; a field that is
/// present but blank is coerced to zero instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormDefaults {
    pub basic_principal: f64,
    pub basic_period: u32,
    pub basic_rate_percent: f64,
    pub basic_frequency: u32,

    pub recurring_principal: f64,
    pub recurring_monthly_deposit: f64,
    pub recurring_period: u32,
    pub recurring_rate_percent: f64,

    pub current_age: u32,
    pub retirement_age: u32,
    pub monthly_expense: f64,
    pub inflation_rate_percent: f64,
    pub retirement_return_percent: f64,

    pub goal_current_assets: f64,
    pub goal_return_percent: f64,
    pub goal_monthly_contribution: f64,
}

pub const FORM_DEFAULTS: FormDefaults = FormDefaults {
    basic_principal: 10_000_000.0,
    basic_period: 10,
    basic_rate_percent: 7.0,
    basic_frequency: 1,

    recurring_principal: 10_000_000.0,
    recurring_monthly_deposit: 1_000_000.0,
    recurring_period: 40,
    recurring_rate_percent: 12.0,

    current_age: 30,
    retirement_age: 65,
    monthly_expense: 4_000_000.0,
    inflation_rate_percent: 2.5,
    retirement_return_percent: 7.0,

    goal_current_assets: 50_000_000.0,
    goal_return_percent: 8.0,
    goal_monthly_contribution: 500_000.0,
};

impl Default for FormDefaults {
    fn default() -> Self {
        FORM_DEFAULTS
    }
}

pub const DEFAULT_PORT: u16 = 8080;

/// Longest duration the HTTP service will simulate; the recurring calculator walks every
/// month.
pub const DEFAULT_MAX_DURATION_MONTHS: u32 = 12 * 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub max_duration_months: u32,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_duration_months: DEFAULT_MAX_DURATION_MONTHS,
        }
    }
}
