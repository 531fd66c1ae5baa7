// Case data module entrypoint
pub mod adapters;      // feed-specific decoders (SCMP, Bing)
pub mod normaliser;    // comma-grouped counts, country lookup keys
pub mod transport;     // HTTP retrieval of raw feed documents
pub mod case_book;     // current record set + totals
pub mod orchestrator;  // fetch state machine driving everything
pub mod timestamp;     // feed "last updated" formatting
