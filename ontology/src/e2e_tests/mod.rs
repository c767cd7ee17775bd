//! End-to-end tests over whole OBO documents.
//!
//! Each test file covers one scenario: a document goes in through the bulk
//! loader or the stream reader and the resulting tables, terms and
//! diagnostics are checked.

#![cfg(test)]

mod helpers;

mod test_alt_ids;
mod test_continuation;
mod test_cross_references;
mod test_idempotence;
mod test_list_expansion;
mod test_name_keys;
mod test_query_matching;
mod test_round_trip;
mod test_sanitize;
mod test_serialized_shape;
mod test_stanza_order;
mod test_stream_vs_bulk;
