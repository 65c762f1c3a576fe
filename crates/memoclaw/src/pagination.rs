//! Offset pagination as a lazy stream.
//!
//! The offset advances by the number of records actually returned, so short
//! final pages are handled. Iteration stops on an empty page or once the
//! offset reaches the server-reported `total`. Nothing is snapshotted: records
//! inserted or removed mid-iteration may be skipped or seen twice.

use std::future::Future;

use futures::Stream;

use crate::error::Result;
use crate::types::{ListResponse, Memory};

/// One page of results plus the server's total count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl From<ListResponse> for Page<Memory> {
    fn from(response: ListResponse) -> Self {
        Page {
            items: response.memories,
            total: response.total,
        }
    }
}

/// Yield every record from `fetch(limit, offset)`, one page at a time.
///
/// Only one fetch is outstanding at a time. The stream is `!Unpin`; pin it
/// (`futures::pin_mut!` or `Box::pin`) before calling `next()`.
pub fn paginate<T, F, Fut>(batch_size: u32, mut fetch: F) -> impl Stream<Item = Result<T>>
where
    F: FnMut(u32, u64) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    async_stream::try_stream! {
        let mut offset: u64 = 0;
        loop {
            let page = fetch(batch_size, offset).await?;
            let returned = page.items.len() as u64;
            for item in page.items {
                yield item;
            }
            offset += returned;
            if returned == 0 || offset >= page.total {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MemoClawError;
    use futures::{StreamExt, TryStreamExt};
    use std::sync::Mutex;

    /// Serves slices of `data` and records every (limit, offset) call.
    fn fake_list(
        data: Vec<u32>,
        calls: &Mutex<Vec<(u32, u64)>>,
    ) -> impl FnMut(u32, u64) -> futures::future::Ready<Result<Page<u32>>> + '_ {
        move |limit, offset| {
            calls.lock().unwrap().push((limit, offset));
            let start = (offset as usize).min(data.len());
            let end = (start + limit as usize).min(data.len());
            futures::future::ready(Ok(Page {
                items: data[start..end].to_vec(),
                total: data.len() as u64,
            }))
        }
    }

    #[tokio::test]
    async fn test_three_records_in_batches_of_two() {
        let calls = Mutex::new(Vec::new());
        let items: Vec<u32> = paginate(2, fake_list(vec![1, 2, 3], &calls))
            .try_collect()
            .await
            .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        // no trailing empty-page fetch
        assert_eq!(*calls.lock().unwrap(), vec![(2, 0), (2, 2)]);
    }

    #[tokio::test]
    async fn test_empty_first_page() {
        let calls = Mutex::new(Vec::new());
        let items: Vec<u32> = paginate(50, fake_list(vec![], &calls))
            .try_collect()
            .await
            .unwrap();

        assert!(items.is_empty());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_short_page_before_total_stops_on_empty() {
        // Server claims 10 but only has 3: offset advances by what came back.
        let calls = Mutex::new(Vec::new());
        let fetch = |limit: u32, offset: u64| {
            calls.lock().unwrap().push((limit, offset));
            let items = if offset == 0 { vec!["a", "b", "c"] } else { vec![] };
            futures::future::ready(Ok(Page { items, total: 10 }))
        };
        let items: Vec<&str> = paginate(5, fetch).try_collect().await.unwrap();

        assert_eq!(items, vec!["a", "b", "c"]);
        assert_eq!(*calls.lock().unwrap(), vec![(5, 0), (5, 3)]);
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let mut served = 0;
        let fetch = move |_limit: u32, _offset: u64| {
            served += 1;
            let result = if served == 1 {
                Ok(Page { items: vec![1u32], total: 5 })
            } else {
                Err(MemoClawError::Cancelled)
            };
            futures::future::ready(result)
        };
        let results: Vec<Result<u32>> = paginate(1, fetch).collect().await;

        assert_eq!(results.len(), 2);
        assert_eq!(*results[0].as_ref().unwrap(), 1);
        assert!(results[1].as_ref().unwrap_err().is_cancelled());
    }
}
