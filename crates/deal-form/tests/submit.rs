use api_client::testing::StubTransport;
use api_client::{EVALUATE_DEAL_PATH, EvaluatorClient, GET_INDUSTRY_MULTIPLES_PATH, TransportCause};
use config_store::{ConfigStore, Fallback};
use configuration::CoercionPolicy;
use core_types::{DealResult, ValidationError, fallback_multiples};
use deal_form::{
    DealForm, EVALUATION_FAILED_MESSAGE, SubmitAttempt, SubmitOutcome, industry_options,
    submit_deal,
};
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use session::EvaluationSession;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

fn evaluation() -> Value {
    json!({
        "growth_rates": [100.0, 50.0],
        "implied_multiples": 66.67,
        "discount_rate_assessment": "Does not apply",
        "valuation_assessment": "High Valuation",
        "runway_assessment": "Inadequate"
    })
}

fn fill(form: &mut DealForm, fields: &[(&str, &str)]) {
    for (name, value) in fields {
        form.set_field(name, value).expect("field accepted");
    }
}

fn complete_form() -> DealForm {
    let mut form = DealForm::new();
    fill(
        &mut form,
        &[
            ("company_name", "Acme"),
            ("industry", "Software"),
            ("ask", "250000"),
            ("valuation_cap", "3000000"),
            ("security_type", "Preferred Equity"),
            ("discount_rate", "0"),
            ("interest", "0"),
            ("yearly_revenue", "5000, 10000, 15000"),
            ("monthly_burn", "8000"),
            ("current_cash", "120000"),
        ],
    );
    form
}

fn session_over(stub: Arc<StubTransport>) -> EvaluationSession {
    EvaluationSession::new(EvaluatorClient::new(stub))
}

#[tokio::test]
async fn malformed_revenue_never_reaches_the_transport() {
    let stub = Arc::new(StubTransport::new().respond(EVALUATE_DEAL_PATH, evaluation()));
    let session = session_over(stub.clone());
    let multiples = fallback_multiples();

    for bad in ["5000, abc, 15000", "5000,,15000", "5000;10000", ""] {
        let mut form = complete_form();
        form.set_field("yearly_revenue", bad).expect("list input");
        let form = Mutex::new(form);

        let outcome = submit_deal(&form, &multiples, &session).await;
        assert!(
            matches!(outcome, SubmitOutcome::Invalid(ValidationError::MalformedRevenue { .. })),
            "`{bad}` gave {outcome:?}"
        );
        let form = form.lock().await;
        let message = form.state().error().expect("form shows the error");
        assert!(message.contains("could not parse"), "message was {message}");
    }

    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn revenue_history_keeps_its_order() {
    let mut form = complete_form();
    match form.begin_submit(&fallback_multiples()) {
        SubmitAttempt::Ready(request) => {
            assert_eq!(request.yearly_revenue, vec![dec!(5000), dec!(10000), dec!(15000)]);
        }
        other => panic!("expected a request, got {other:?}"),
    }
    assert!(form.is_submitting());
}

#[tokio::test]
async fn safe_scenario_defaults_previous_raise_and_keeps_percent_scale() {
    let stub = Arc::new(StubTransport::new().respond(EVALUATE_DEAL_PATH, evaluation()));
    let session = session_over(stub.clone());
    let mut form = DealForm::new();
    fill(
        &mut form,
        &[
            ("company_name", "Zero Revenue Co"),
            ("industry", "Software"),
            ("ask", "100000"),
            ("valuation_cap", "1000000"),
            ("security_type", "SAFE"),
            ("discount_rate", "20"),
            ("interest", "0"),
            ("yearly_revenue", "0,0,0"),
            ("monthly_burn", "5000"),
            ("current_cash", "20000"),
            ("previous_raise", ""),
        ],
    );
    let form = Mutex::new(form);

    let outcome = submit_deal(&form, &fallback_multiples(), &session).await;
    assert_eq!(outcome, SubmitOutcome::Evaluated(DealResult(evaluation())));

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    let body = calls[0].body.as_ref().expect("JSON body");
    assert_eq!(body["previous_raise"].as_f64(), Some(0.0));
    assert_eq!(body["discount_rate"].as_f64(), Some(20.0));
    assert_eq!(body["interest"].as_f64(), Some(0.0));
    assert_eq!(body["security_type"], json!("SAFE"));
    let revenue: Vec<f64> = body["yearly_revenue"]
        .as_array()
        .expect("revenue array")
        .iter()
        .map(|v| v.as_f64().expect("number"))
        .collect();
    assert_eq!(revenue, vec![0.0, 0.0, 0.0]);

    let form = form.lock().await;
    assert_eq!(form.state().result(), Some(&DealResult(evaluation())));
    assert_eq!(form.draft().previous_raise, "");
}

#[tokio::test]
async fn second_submit_while_in_flight_is_rejected() {
    let gate = Arc::new(Notify::new());
    let stub = Arc::new(
        StubTransport::new()
            .respond(EVALUATE_DEAL_PATH, evaluation())
            .gated(gate.clone()),
    );
    let session = session_over(stub.clone());
    let multiples = fallback_multiples();
    let form = Mutex::new(complete_form());

    let (first, second, ()) = tokio::join!(
        submit_deal(&form, &multiples, &session),
        submit_deal(&form, &multiples, &session),
        async {
            tokio::task::yield_now().await;
            gate.notify_one();
        }
    );

    assert_eq!(stub.calls().len(), 1);
    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|o| **o == SubmitOutcome::Busy).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| matches!(o, SubmitOutcome::Evaluated(_)))
            .count(),
        1
    );
    assert!(!form.lock().await.is_submitting());
}

#[tokio::test]
async fn transport_failure_shows_generic_message_and_clears_result() {
    let ok = Arc::new(StubTransport::new().respond(EVALUATE_DEAL_PATH, evaluation()));
    let failing = Arc::new(StubTransport::new().fail(
        EVALUATE_DEAL_PATH,
        TransportCause::Status { status: 500, body: "Internal Server Error".to_string() },
    ));
    let multiples = fallback_multiples();
    let form = Mutex::new(complete_form());

    let outcome = submit_deal(&form, &multiples, &session_over(ok)).await;
    assert!(matches!(outcome, SubmitOutcome::Evaluated(_)));

    let outcome = submit_deal(&form, &multiples, &session_over(failing.clone())).await;
    assert_eq!(outcome, SubmitOutcome::Failed(EVALUATION_FAILED_MESSAGE.to_string()));
    assert_eq!(failing.calls().len(), 1);

    let form = form.lock().await;
    assert_eq!(form.state().error(), Some(EVALUATION_FAILED_MESSAGE));
    assert!(form.state().result().is_none());
    assert_eq!(form.draft().company_name, "Acme");
}

#[tokio::test]
async fn resubmitting_after_a_result_sends_again() {
    let stub = Arc::new(StubTransport::new().respond(EVALUATE_DEAL_PATH, evaluation()));
    let session = session_over(stub.clone());
    let multiples = fallback_multiples();
    let form = Mutex::new(complete_form());

    submit_deal(&form, &multiples, &session).await;
    form.lock().await.set_field("ask", "300000").expect("edit");
    submit_deal(&form, &multiples, &session).await;

    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].body.as_ref().expect("body")["ask"].as_f64(), Some(300000.0));
}

#[tokio::test]
async fn industry_options_track_the_latest_loaded_table() {
    let stub = Arc::new(StubTransport::new().respond(
        GET_INDUSTRY_MULTIPLES_PATH,
        json!({ "industry_multiples": { "Software": 3.13, "Robotics": 2.78, "Other": null } }),
    ));
    let mut store = ConfigStore::new(
        EvaluatorClient::new(stub),
        Fallback::default(),
        CoercionPolicy::Lenient,
    );

    assert_eq!(industry_options(store.multiples()).len(), 40);

    let loaded: BTreeSet<String> = store
        .load_multiples()
        .await
        .expect("multiples load")
        .industries()
        .map(str::to_string)
        .collect();
    let offered: BTreeSet<String> = industry_options(store.multiples())
        .into_iter()
        .map(|option| option.name)
        .collect();
    assert_eq!(offered, loaded);

    let other = industry_options(store.multiples())
        .into_iter()
        .find(|option| option.name == "Other")
        .expect("Other is offered");
    assert_eq!(other.multiple, None);

    let mut form = complete_form();
    form.set_field("industry", "Other").expect("choice");
    assert!(matches!(form.begin_submit(store.multiples()), SubmitAttempt::Ready(_)));

    // Industries only present in the fallback are no longer accepted.
    let mut form = complete_form();
    form.set_field("industry", "Biotechnology").expect("choice");
    assert_eq!(
        form.begin_submit(store.multiples()),
        SubmitAttempt::Invalid(ValidationError::UnknownIndustry("Biotechnology".to_string()))
    );
}
