use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use quiz_core::model::{OPTION_COUNT, Question, QuestionId, Quiz, QuizId};
use quiz_core::score::{Classification, ScoreReport};
use quiz_core::time::fixed_clock;
use services::{
    Clock, ContentError, InMemoryContent, RecordingSink, ReportError, ReportSink, SessionError,
    SessionLoopService, SessionOutcome,
};

fn build_quiz(quiz_id: u64, correct: &[usize], time_limit_secs: u32) -> Quiz {
    let questions = correct
        .iter()
        .enumerate()
        .map(|(i, &answer)| {
            let options: [String; OPTION_COUNT] = ["A", "B", "C", "D"].map(String::from);
            Question::new(
                QuestionId::new(i as u64 + 1),
                format!("Q{}", i + 1),
                options,
                answer,
                None,
            )
            .unwrap()
        })
        .collect();
    Quiz::new(
        QuizId::new(quiz_id),
        "World Capitals Challenge",
        Some("Test your knowledge of world capitals".into()),
        time_limit_secs,
        questions,
    )
    .unwrap()
}

fn build_service(quiz: Quiz, sink: Arc<RecordingSink>) -> SessionLoopService {
    let content = Arc::new(InMemoryContent::new(vec![quiz]));
    SessionLoopService::new(fixed_clock(), content, sink)
}

#[tokio::test]
async fn full_run_reports_excellent() {
    // Correct answers [2,2,2,3,3]; the user picks [2,2,0,3,3].
    let sink = Arc::new(RecordingSink::new());
    let service = build_service(build_quiz(1, &[2, 2, 2, 3, 3], 900), Arc::clone(&sink));

    let mut session = service.start_session(QuizId::new(1)).await.unwrap();
    let picks = [2, 2, 0, 3, 3];
    let mut last = SessionOutcome::Continue;
    for pick in picks {
        session.select_answer(pick).unwrap();
        last = service.advance(&mut session).await.unwrap();
    }

    let SessionOutcome::Completed { report } = last else {
        panic!("session should complete after the last advance");
    };
    assert_eq!(report.correct_count(), 4);
    assert_eq!(report.percentage(), 80);
    assert_eq!(report.classification(), Classification::Excellent);

    let submissions = sink.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0, QuizId::new(1));
    assert_eq!(submissions[0].1, report);
}

#[tokio::test]
async fn full_run_reports_keep_practicing() {
    // Same quiz, option 0 picked everywhere: zero correct.
    let sink = Arc::new(RecordingSink::new());
    let service = build_service(build_quiz(1, &[2, 2, 2, 3, 3], 900), Arc::clone(&sink));

    let mut session = service.start_session(QuizId::new(1)).await.unwrap();
    for _ in 0..5 {
        session.select_answer(0).unwrap();
        service.advance(&mut session).await.unwrap();
    }

    let report = &sink.submissions()[0].1;
    assert_eq!(report.correct_count(), 0);
    assert_eq!(report.percentage(), 0);
    assert_eq!(report.classification(), Classification::KeepPracticing);
}

#[tokio::test]
async fn timer_expiry_completes_with_partial_answers() {
    // Three second budget; two questions answered correctly before time
    // runs out. The remaining questions count as incorrect.
    let sink = Arc::new(RecordingSink::new());
    let service = build_service(build_quiz(1, &[2, 2, 2, 3, 3], 3), Arc::clone(&sink));

    let mut session = service.start_session(QuizId::new(1)).await.unwrap();
    for _ in 0..2 {
        session.select_answer(2).unwrap();
        service.advance(&mut session).await.unwrap();
    }

    assert_eq!(
        service.tick(&mut session).await.unwrap(),
        SessionOutcome::Continue
    );
    assert_eq!(
        service.tick(&mut session).await.unwrap(),
        SessionOutcome::Continue
    );
    let outcome = service.tick(&mut session).await.unwrap();

    let SessionOutcome::Completed { report } = outcome else {
        panic!("third tick should force completion");
    };
    assert_eq!(report.correct_count(), 2);
    assert_eq!(report.total_questions(), 5);
    assert_eq!(sink.submissions().len(), 1);
}

#[tokio::test]
async fn out_of_range_selection_is_rejected() {
    let sink = Arc::new(RecordingSink::new());
    let service = build_service(build_quiz(1, &[2], 60), Arc::clone(&sink));

    let mut session = service.start_session(QuizId::new(1)).await.unwrap();
    session.select_answer(1).unwrap();

    let err = session.select_answer(5).unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidSelection { index: 5, limit: 4 }
    ));
    // The prior selection survives the rejected call.
    assert_eq!(session.controller().selected(), Some(1));
}

#[tokio::test]
async fn unknown_quiz_fails_to_start() {
    let sink = Arc::new(RecordingSink::new());
    let service = build_service(build_quiz(1, &[0], 60), sink);

    let err = service.start_session(QuizId::new(99)).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Content(ContentError::NotFound(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn timer_driven_loop_submits_exactly_one_report() {
    // Drive the session purely off timer signals. Any Expired signal still
    // queued after the final tick must not produce a second report.
    let sink = Arc::new(RecordingSink::new());
    let service = build_service(build_quiz(1, &[0, 1], 2), Arc::clone(&sink));

    let mut session = service.start_session(QuizId::new(1)).await.unwrap();
    session.select_answer(0).unwrap();

    while let Some(signal) = session.next_signal().await {
        service.apply_signal(&mut session, signal).await.unwrap();
    }

    assert!(session.is_complete());
    let submissions = sink.submissions();
    assert_eq!(submissions.len(), 1);
    // The pending selection on question one folds in; question two was
    // never reached and counts as incorrect.
    assert_eq!(submissions[0].1.correct_count(), 1);
    assert_eq!(submissions[0].1.total_questions(), 2);
}

#[tokio::test(start_paused = true)]
async fn finishing_early_stops_the_timer() {
    let sink = Arc::new(RecordingSink::new());
    let service = build_service(build_quiz(1, &[0], 600), Arc::clone(&sink));

    let mut session = service.start_session(QuizId::new(1)).await.unwrap();
    session.select_answer(0).unwrap();
    let outcome = service.advance(&mut session).await.unwrap();
    assert!(matches!(outcome, SessionOutcome::Completed { .. }));

    // The countdown was cancelled; the signal stream ends without waiting
    // out the remaining 600 seconds.
    while session.next_signal().await.is_some() {}
    assert_eq!(sink.submissions().len(), 1);
}

/// Sink that fails once, then accepts, for exercising the retry path.
struct FlakySink {
    failed: AtomicBool,
    inner: RecordingSink,
}

impl FlakySink {
    fn new() -> Self {
        Self {
            failed: AtomicBool::new(false),
            inner: RecordingSink::new(),
        }
    }
}

#[async_trait]
impl ReportSink for FlakySink {
    async fn submit(&self, quiz_id: QuizId, report: &ScoreReport) -> Result<(), ReportError> {
        if !self.failed.swap(true, Ordering::SeqCst) {
            return Err(ReportError::Unavailable("profile service down".into()));
        }
        self.inner.submit(quiz_id, report).await
    }
}

#[tokio::test]
async fn report_submission_can_be_retried() {
    let sink = Arc::new(FlakySink::new());
    let content = Arc::new(InMemoryContent::new(vec![build_quiz(1, &[0], 60)]));
    let service = SessionLoopService::new(Clock::default_clock(), content, sink.clone());

    let mut session = service.start_session(QuizId::new(1)).await.unwrap();
    session.select_answer(0).unwrap();

    let err = service.advance(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::Report(_)));
    // The session itself still completed; only the hand-off failed.
    assert!(session.is_complete());

    let report = service.finalize_report(&mut session).await.unwrap();
    assert_eq!(report.correct_count(), 1);
    assert_eq!(sink.inner.submissions().len(), 1);

    // Already submitted: a second finalize does not resubmit.
    service.finalize_report(&mut session).await.unwrap();
    assert_eq!(sink.inner.submissions().len(), 1);
}
