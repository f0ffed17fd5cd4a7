use log::warn;

use crate::error::{LoadFailure, Result};

/// Result of a screen's initial fetch.
///
/// A failed load stays failed: nothing retries, the user re-runs the command.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(LoadFailure),
}

impl<T> LoadState<T> {
    /// Fetch failures become `Failed`; any other error is passed back.
    pub fn from_result(result: Result<T>) -> Result<Self> {
        match result {
            Ok(data) => Ok(LoadState::Loaded(data)),
            Err(e) => match e.load_failure() {
                Some(failure) => {
                    warn!("initial load failed: {e:?}");
                    Ok(LoadState::Failed(failure))
                }
                None => Err(e),
            },
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<LoadFailure> {
        match self {
            LoadState::Failed(failure) => Some(*failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    #[test]
    fn classified_errors_become_failed_state() {
        let state: LoadState<Vec<u8>> = LoadState::from_result(Err(DashboardError::Server {
            url: "http://localhost/billing-items/".into(),
            status: 500,
        }))
        .unwrap();
        assert_eq!(state.failure(), Some(LoadFailure::Server));
        assert!(state.data().is_none());
    }

    #[test]
    fn other_errors_propagate() {
        let result: Result<LoadState<()>> =
            LoadState::from_result(Err(DashboardError::NothingToExport));
        assert!(result.is_err());

        let loaded = LoadState::from_result(Ok(vec![1, 2])).unwrap();
        assert_eq!(loaded.data(), Some(&vec![1, 2]));
    }
}
