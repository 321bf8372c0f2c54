pub mod crawl {

    /// How many levels of related-series expansion a crawl may follow. The
    /// root series expands into people and their series; those series are
    /// ingested without further expansion.
    pub const EXPANSION_DEPTH: u8 = 1;

    pub const DEFAULT_RATE_LIMIT: usize = 20;

    /// Cast members billed at this order or better count as important.
    pub const DEFAULT_BILLING_ORDER_CUTOFF: i32 = 10;

    /// Crew job titles worth following into their other series.
    pub const DEFAULT_IMPORTANT_JOBS: &[&str] = &[
        "Creator",
        "Director",
        "Writer",
        "Executive Producer",
        "Producer",
        "Showrunner",
        "Director of Photography",
        "Original Music Composer",
    ];

    pub const DEFAULT_BACKOFF_MIN_MS: u64 = 1000;

    pub const DEFAULT_BACKOFF_MAX_MS: u64 = 2000;
}

pub mod limits {

    pub const MAX_SEARCH_RESULTS: usize = 10;

    pub const OVERVIEW_SNIPPET_CHARS: usize = 140;
}
