pub mod rate_limiter;

#[cfg(test)]
pub(crate) mod http_stub;

pub use rate_limiter::RateLimiter;
