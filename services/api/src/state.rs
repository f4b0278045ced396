use interview_core::Interview;
use interview_service::Assessors;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

pub type SharedInterview = Arc<Mutex<Interview>>;

struct SessionEntry {
    interview: SharedInterview,
    last_active: Instant,
}

/// Shared by every handler. Each session has its own lock, so slow
/// evaluations in one session do not block the others.
#[derive(Clone)]
pub struct AppState {
    pub assessors: Assessors,
    pub evaluation_timeout: Duration,
    /// Sessions untouched for this long are dropped by [`AppState::reap_idle`].
    pub session_ttl: Duration,
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl AppState {
    pub fn new(assessors: Assessors, evaluation_timeout: Duration, session_ttl: Duration) -> Self {
        Self {
            assessors,
            evaluation_timeout,
            session_ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, id: String, interview: Interview) {
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                interview: Arc::new(Mutex::new(interview)),
                last_active: Instant::now(),
            },
        );
    }

    /// Looks up a session and marks it active.
    pub async fn get(&self, id: &str) -> Option<SharedInterview> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_active = Instant::now();
        Some(entry.interview.clone())
    }

    pub async fn remove(&self, id: &str) -> Option<SharedInterview> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|entry| entry.interview)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session idle for at least `session_ttl`, finished or not.
    /// A session with an evaluation in flight is kept. Returns how many were
    /// dropped.
    pub async fn reap_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let idle = entry.last_active.elapsed() >= self.session_ttl;
            let busy = entry.interview.try_lock().is_err();
            if idle && !busy {
                tracing::info!(session_id = %id, "Dropping idle interview session");
            }
            !idle || busy
        });
        before - sessions.len()
    }
}

/// Runs [`AppState::reap_idle`] every `period` until the runtime shuts down.
pub fn spawn_reaper(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let reaped = state.reap_idle().await;
            if reaped > 0 {
                tracing::debug!("Reaped {} idle sessions", reaped);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::simulated::SimulatedAssessor;

    fn state(session_ttl: Duration) -> AppState {
        let simulated = Arc::new(SimulatedAssessor);
        AppState::new(
            Assessors {
                generator: simulated.clone(),
                evaluator: simulated.clone(),
            },
            Duration::from_secs(5),
            session_ttl,
        )
    }

    fn interview() -> Interview {
        Interview::new(Arc::new(SimulatedAssessor), "Tester at Company - Skills: Various")
    }

    #[tokio::test]
    async fn test_reap_idle_keeps_fresh_sessions() {
        let state = state(Duration::from_secs(600));
        state.insert("a".to_string(), interview()).await;

        assert_eq!(state.reap_idle().await, 0);
        assert!(state.get("a").await.is_some());
    }

    #[tokio::test]
    async fn test_reap_idle_drops_stale_but_not_busy_sessions() {
        let state = state(Duration::ZERO);
        state.insert("idle".to_string(), interview()).await;
        state.insert("busy".to_string(), interview()).await;

        let busy = state.get("busy").await.unwrap();
        let guard = busy.lock().await;
        assert_eq!(state.reap_idle().await, 1);
        assert!(state.get("idle").await.is_none());
        assert!(state.get("busy").await.is_some());

        drop(guard);
        assert_eq!(state.reap_idle().await, 1);
        assert_eq!(state.len().await, 0);
    }

    #[tokio::test]
    async fn test_reaper_task_empties_abandoned_sessions() {
        let state = state(Duration::from_millis(20));
        state.insert("abandoned".to_string(), interview()).await;

        let reaper = spawn_reaper(state.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(200)).await;
        reaper.abort();

        assert_eq!(state.len().await, 0);
    }
}
