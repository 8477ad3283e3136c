//! Comprehensive tests for domain_billing

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{AssignmentId, BillingMonth, ClientId, Money, ServiceId, Timezone};

use domain_billing::adapters::{
    InMemoryAssignmentStore, InMemoryClientStore, InMemoryInvoiceStore, InMemoryServiceStore,
};
use domain_billing::{
    compute_invoice_preview, prorate, BillingError, BillingService, InvoiceColumn, InvoiceDocument,
    InvoicePreview, InvoicePreviewRequest, InvoiceTable, ServiceAssignment, ServiceCatalog,
    ServiceUpdate,
};

use test_utils::{
    assignment_strategy, billing_month_strategy, date, month, rate_strategy, AssignmentBuilder,
    CatalogFixtures, ClientFixtures, IdFixtures, TemporalFixtures,
};

fn preview_for(months: &[BillingMonth], assignments: &[ServiceAssignment]) -> InvoicePreview {
    compute_invoice_preview(
        IdFixtures::client(),
        months,
        assignments,
        &CatalogFixtures::catalog(),
        TemporalFixtures::far_future(),
    )
    .unwrap()
}

// ============================================================================
// Proration Tests
// ============================================================================

mod proration_tests {
    use super::*;

    #[test]
    fn test_half_month_at_310() {
        let a = AssignmentBuilder::new(1)
            .billing_start(2025, 3, 15)
            .rate(dec!(310))
            .build();

        let p = prorate(&a, month(2025, 3), TemporalFixtures::far_future())
            .unwrap()
            .unwrap();
        assert_eq!(p.days, 17);
        assert_eq!(p.amount, Money::new(dec!(170.00)));
    }

    #[test]
    fn test_full_month_bills_rate() {
        let a = AssignmentBuilder::new(1).billing_start(2025, 4, 1).build();

        let p = prorate(&a, month(2025, 4), TemporalFixtures::far_future())
            .unwrap()
            .unwrap();
        assert_eq!(p.days, 30);
        assert_eq!(p.amount, Money::new(dec!(100.00)));
    }

    #[test]
    fn test_start_month_then_full_month() {
        let a = AssignmentBuilder::new(1).billing_start(2025, 1, 20).build();
        let preview = preview_for(&[month(2025, 1), month(2025, 2)], &[a]);

        let jan = &preview.months[0].services[0];
        assert_eq!(jan.prorated_days, 12);
        assert_eq!(jan.prorated_amount, Money::new(dec!(38.71)));

        let feb = &preview.months[1].services[0];
        assert_eq!(feb.prorated_days, 28);
        assert_eq!(feb.prorated_amount, Money::new(dec!(100.00)));
    }

    #[test]
    fn test_leap_february() {
        let a = AssignmentBuilder::new(1).billing_start(2024, 2, 15).build();
        let preview = preview_for(&[month(2024, 2)], &[a]);

        let month = &preview.months[0];
        assert_eq!(month.days_in_month, 29);
        assert_eq!(month.services[0].prorated_days, 15);
        assert_eq!(month.services[0].prorated_amount, Money::new(dec!(51.72)));
    }

    #[test]
    fn test_stop_mid_month_bills_through_stop_day() {
        let a = AssignmentBuilder::new(1)
            .billing_start(2025, 1, 1)
            .stopped_on(2025, 3, 10)
            .build();

        let p = prorate(&a, month(2025, 3), TemporalFixtures::far_future())
            .unwrap()
            .unwrap();
        assert_eq!(p.days, 10);
        assert_eq!(p.amount, Money::new(dec!(32.26)));
    }

    #[test]
    fn test_stop_on_first_day_bills_one_day() {
        let a = AssignmentBuilder::new(1)
            .billing_start(2025, 1, 1)
            .stopped_on(2025, 4, 1)
            .build();

        let p = prorate(&a, month(2025, 4), TemporalFixtures::far_future())
            .unwrap()
            .unwrap();
        assert_eq!(p.days, 1);
        assert_eq!(p.amount, Money::new(dec!(3.33)));
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        // 0.15 * 1 / 30 = 0.005
        let a = AssignmentBuilder::new(1)
            .billing_start(2025, 4, 30)
            .rate(dec!(0.15))
            .build();

        let p = prorate(&a, month(2025, 4), TemporalFixtures::far_future())
            .unwrap()
            .unwrap();
        assert_eq!(p.amount, Money::new(dec!(0.01)));
    }

    #[test]
    fn test_month_before_start_has_no_line() {
        let a = AssignmentBuilder::new(1).billing_start(2025, 5, 1).build();
        let result = prorate(&a, month(2025, 4), TemporalFixtures::far_future()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_month_after_stop_has_no_line() {
        let a = AssignmentBuilder::new(1)
            .billing_start(2025, 1, 1)
            .stopped_on(2025, 2, 28)
            .build();
        let result = prorate(&a, month(2025, 3), TemporalFixtures::far_future()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_rate_bills_zero_for_covered_days() {
        let a = AssignmentBuilder::new(1)
            .billing_start(2025, 6, 11)
            .no_rate()
            .build();

        let p = prorate(&a, month(2025, 6), TemporalFixtures::far_future())
            .unwrap()
            .unwrap();
        assert_eq!(p.days, 20);
        assert!(p.amount.is_zero());
    }

    #[test]
    fn test_inactive_without_stop_date_uses_as_of_month() {
        let a = AssignmentBuilder::new(1)
            .billing_start(2025, 1, 1)
            .inactive()
            .build();
        let as_of = date(2025, 3, 18);

        let feb = prorate(&a, month(2025, 2), as_of).unwrap().unwrap();
        assert_eq!(feb.days, 28);
        assert!(prorate(&a, month(2025, 3), as_of).unwrap().is_none());
        assert!(prorate(&a, month(2025, 4), as_of).unwrap().is_none());
    }
}

// ============================================================================
// Preview Tests
// ============================================================================

mod preview_tests {
    use super::*;

    #[test]
    fn test_items_ordered_by_assignment_id() {
        let second = AssignmentBuilder::new(7).service(2).billing_start(2025, 1, 1).build();
        let first = AssignmentBuilder::new(3).service(3).billing_start(2025, 1, 1).build();
        let preview = preview_for(&[month(2025, 2)], &[second, first]);

        let ids: Vec<AssignmentId> = preview.months[0]
            .services
            .iter()
            .map(|s| s.assignment_id)
            .collect();
        assert_eq!(ids, vec![AssignmentId::new(3), AssignmentId::new(7)]);
        assert_eq!(preview.months[0].services[0].service_name, "Colocation");
        assert_eq!(preview.months[0].services[1].service_name, "IP Transit");
    }

    #[test]
    fn test_months_reported_in_request_order() {
        let a = AssignmentBuilder::new(1).billing_start(2025, 1, 1).build();
        let preview = preview_for(&[month(2025, 3), month(2025, 1)], &[a]);

        assert_eq!(preview.billed_months(), vec![month(2025, 3), month(2025, 1)]);
        assert_eq!(preview.months[0].label, "March 2025");
        assert_eq!(preview.months[1].label, "January 2025");
    }

    #[test]
    fn test_other_clients_are_ignored() {
        let mine = AssignmentBuilder::new(1).billing_start(2025, 1, 1).build();
        let theirs = AssignmentBuilder::new(2)
            .client(2)
            .billing_start(2025, 1, 1)
            .rate(dec!(999))
            .build();
        let preview = preview_for(&[month(2025, 1)], &[mine, theirs]);

        assert_eq!(preview.line_count(), 1);
        assert_eq!(preview.total(), Money::new(dec!(100.00)));
    }

    #[test]
    fn test_client_without_assignments_gets_empty_months() {
        let preview = preview_for(&[month(2025, 1), month(2025, 2)], &[]);

        assert_eq!(preview.months.len(), 2);
        assert!(preview.months.iter().all(|m| m.services.is_empty()));
        assert!(preview.total().is_zero());
    }

    #[test]
    fn test_unknown_service_gets_placeholder_name() {
        let a = AssignmentBuilder::new(1)
            .service(99)
            .billing_start(2025, 1, 1)
            .build();
        let preview = preview_for(&[month(2025, 1)], &[a]);

        let item = &preview.months[0].services[0];
        assert_eq!(item.service_id, ServiceId::new(99));
        assert_eq!(item.service_name, "Unknown service #99");
    }

    #[test]
    fn test_line_item_carries_assignment_fields() {
        let a = AssignmentBuilder::new(4)
            .billing_start(2025, 1, 10)
            .description("Backup link")
            .link_capacity("1 Gbps")
            .stopped_on(2025, 1, 20)
            .build();
        let preview = preview_for(&[month(2025, 1)], &[a]);

        let item = &preview.months[0].services[0];
        assert_eq!(item.description, "Backup link");
        assert_eq!(item.link_capacity, "1 Gbps");
        assert_eq!(item.billing_start_date, date(2025, 1, 10));
        assert_eq!(item.service_stop_date, Some(date(2025, 1, 20)));
        assert!(!item.status);
        assert_eq!(item.prorated_days, 11);
    }

    #[test]
    fn test_recomputation_is_identical() {
        let assignments = vec![
            AssignmentBuilder::new(1).billing_start(2025, 1, 20).build(),
            AssignmentBuilder::new(2)
                .service(2)
                .billing_start(2025, 1, 1)
                .stopped_on(2025, 2, 14)
                .rate(dec!(250))
                .build(),
        ];
        let months = [month(2025, 1), month(2025, 2)];

        let first = serde_json::to_string(&preview_for(&months, &assignments)).unwrap();
        let second = serde_json::to_string(&preview_for(&months, &assignments)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_months_is_invalid_input() {
        let result = compute_invoice_preview(
            IdFixtures::client(),
            &[],
            &[],
            &ServiceCatalog::new(),
            TemporalFixtures::far_future(),
        );
        assert!(matches!(result, Err(BillingError::InvalidInput(_))));
    }

    #[test]
    fn test_billing_before_service_month_is_invalid_input() {
        let a = AssignmentBuilder::new(1)
            .service_start_month(month(2025, 2))
            .billing_start(2025, 1, 15)
            .build();
        let result = compute_invoice_preview(
            IdFixtures::client(),
            &[month(2025, 2)],
            &[a],
            &CatalogFixtures::catalog(),
            TemporalFixtures::far_future(),
        );
        assert!(matches!(result, Err(BillingError::InvalidInput(_))));
    }

    #[test]
    fn test_stop_before_billing_start_is_invalid_input() {
        let a = AssignmentBuilder::new(1)
            .billing_start(2025, 3, 10)
            .stopped_on(2025, 3, 9)
            .build();
        let result = compute_invoice_preview(
            IdFixtures::client(),
            &[month(2025, 3)],
            &[a],
            &CatalogFixtures::catalog(),
            TemporalFixtures::far_future(),
        );
        match result {
            Err(BillingError::InvalidInput(msg)) => assert!(msg.contains("assignment 1")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_rate_is_invalid_input() {
        let a = AssignmentBuilder::new(1)
            .billing_start(2025, 1, 1)
            .rate(dec!(-5))
            .build();
        let result = compute_invoice_preview(
            IdFixtures::client(),
            &[month(2025, 1)],
            &[a],
            &CatalogFixtures::catalog(),
            TemporalFixtures::far_future(),
        );
        assert!(matches!(result, Err(BillingError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_assignment_of_other_client_is_ignored() {
        let broken = AssignmentBuilder::new(1)
            .client(2)
            .billing_start(2025, 3, 10)
            .stopped_on(2025, 3, 1)
            .build();
        let preview = preview_for(&[month(2025, 3)], &[broken]);
        assert_eq!(preview.line_count(), 0);
    }

    #[test]
    fn test_preview_json_shape() {
        let a = AssignmentBuilder::new(1)
            .billing_start(2025, 3, 15)
            .rate(dec!(310))
            .build();
        let preview = preview_for(&[month(2025, 3)], &[a]);
        let json = serde_json::to_value(&preview).unwrap();

        let item = &json["months"][0]["services"][0];
        assert_eq!(json["months"][0]["month"], "2025-03-01");
        assert_eq!(item["prorated_days"], 17);
        assert_eq!(item["billing_start_date"], "2025-03-15");
        assert!(item.get("service_stop_date").is_none());
    }
}

// ============================================================================
// Invoice Table Tests
// ============================================================================

mod invoice_table_tests {
    use super::*;

    fn sample_preview() -> InvoicePreview {
        let assignments = vec![
            AssignmentBuilder::new(1)
                .billing_start(2025, 1, 20)
                .link_capacity("100 Mbps")
                .build(),
            AssignmentBuilder::new(2).service(2).billing_start(2025, 2, 1).no_rate().build(),
        ];
        preview_for(&[month(2025, 1), month(2025, 2)], &assignments)
    }

    #[test]
    fn test_one_row_per_line_item() {
        let table = InvoiceTable::from_preview(&sample_preview(), &InvoiceColumn::ALL);
        assert_eq!(table.rows.len(), 3);
        assert!(table.rows.iter().all(|r| r.len() == InvoiceColumn::ALL.len()));
        assert_eq!(table.total, Money::new(dec!(138.71)));
    }

    #[test]
    fn test_selected_columns_in_order() {
        let columns = [InvoiceColumn::Service, InvoiceColumn::Days, InvoiceColumn::Amount];
        let table = InvoiceTable::from_preview(&sample_preview(), &columns);

        assert_eq!(table.headers(), vec!["SERVICE", "DAYS", "AMOUNT"]);
        assert_eq!(table.rows[0], vec!["Dedicated Internet", "12", "38.71"]);
    }

    #[test]
    fn test_missing_rate_renders_blank_cell() {
        let table = InvoiceTable::from_preview(&sample_preview(), &[InvoiceColumn::Month, InvoiceColumn::Rate]);
        assert_eq!(table.rows[2], vec!["February 2025".to_string(), String::new()]);
    }
}

// ============================================================================
// Billing Service Tests
// ============================================================================

mod service_tests {
    use super::*;
    use domain_billing::NewAssignment;

    fn billing_service(assignments: Vec<ServiceAssignment>) -> BillingService {
        BillingService::new(
            Arc::new(InMemoryClientStore::with_clients(ClientFixtures::clients())),
            Arc::new(InMemoryAssignmentStore::with_assignments(assignments)),
            Arc::new(InMemoryServiceStore::with_services(CatalogFixtures::services())),
            Arc::new(InMemoryInvoiceStore::default()),
            Timezone::default(),
        )
    }

    fn request(months: &[&str]) -> InvoicePreviewRequest {
        InvoicePreviewRequest::new(IdFixtures::client(), months.iter().copied())
    }

    #[tokio::test]
    async fn test_preview_reads_client_assignments() {
        let service = billing_service(vec![
            AssignmentBuilder::new(1).billing_start(2025, 3, 15).rate(dec!(310)).build(),
            AssignmentBuilder::new(2).client(2).billing_start(2025, 3, 1).build(),
        ]);

        let preview = service
            .preview_as_of(&request(&["2025-03-01"]), date(2025, 6, 1))
            .await
            .unwrap();
        assert_eq!(preview.line_count(), 1);
        assert_eq!(preview.total(), Money::new(dec!(170.00)));
    }

    #[tokio::test]
    async fn test_preview_rejects_mid_month_date() {
        let service = billing_service(Vec::new());
        let result = service
            .preview_as_of(&request(&["2025-03-15"]), date(2025, 6, 1))
            .await;
        assert!(matches!(result, Err(BillingError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_start_then_stop_assignment() {
        let service = billing_service(Vec::new());
        let new = AssignmentBuilder::new(0).billing_start(2025, 1, 1).new_assignment();

        let started = service.start_assignment(new).await.unwrap();
        assert!(started.is_active());

        let stopped = service
            .stop_assignment(started.id, Some(date(2025, 2, 14)))
            .await
            .unwrap();
        assert!(!stopped.status);
        assert_eq!(stopped.service_stop_date, Some(date(2025, 2, 14)));

        let preview = service
            .preview_as_of(&request(&["2025-02-01", "2025-03-01"]), date(2025, 6, 1))
            .await
            .unwrap();
        assert_eq!(preview.months[0].services[0].prorated_days, 14);
        assert!(preview.months[1].services.is_empty());
    }

    #[tokio::test]
    async fn test_start_assignment_for_unknown_service() {
        let service = billing_service(Vec::new());
        let new: NewAssignment = AssignmentBuilder::new(0).service(42).new_assignment();

        let result = service.start_assignment(new).await;
        assert!(matches!(result, Err(BillingError::ServiceNotFound(id)) if id == ServiceId::new(42)));
    }

    #[tokio::test]
    async fn test_stop_twice_is_invalid_transition() {
        let service = billing_service(vec![AssignmentBuilder::new(1).stopped_on(2025, 2, 1).build()]);
        let result = service.stop_assignment(AssignmentId::new(1), Some(date(2025, 3, 1))).await;
        assert!(matches!(result, Err(BillingError::InvalidStateTransition(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_stops_succeed_once() {
        let service = billing_service(vec![AssignmentBuilder::new(1).billing_start(2025, 1, 1).build()]);
        let id = AssignmentId::new(1);

        let early = tokio::spawn({
            let service = service.clone();
            async move { service.stop_assignment(id, Some(date(2025, 2, 10))).await }
        });
        let late = tokio::spawn({
            let service = service.clone();
            async move { service.stop_assignment(id, Some(date(2025, 3, 20))).await }
        });
        let results = [early.await.unwrap(), late.await.unwrap()];

        let stopped: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(stopped.len(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(BillingError::InvalidStateTransition(_)))));

        let stored = service.list_assignments(None).await.unwrap();
        assert_eq!(stored[0].service_stop_date, stopped[0].service_stop_date);
    }

    #[tokio::test]
    async fn test_stop_before_billing_start_is_invalid() {
        let service = billing_service(vec![AssignmentBuilder::new(1).billing_start(2025, 3, 1).build()]);
        let result = service.stop_assignment(AssignmentId::new(1), Some(date(2025, 2, 28))).await;
        assert!(matches!(result, Err(BillingError::InvalidInput(_))));

        let stored = service.list_assignments(None).await.unwrap();
        assert!(stored[0].is_active());
    }

    #[tokio::test]
    async fn test_start_with_sub_cent_rate_is_invalid() {
        let service = billing_service(Vec::new());
        let new = AssignmentBuilder::new(0).rate(dec!(100.005)).new_assignment();
        let result = service.start_assignment(new).await;
        assert!(matches!(result, Err(BillingError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_stop_unknown_assignment() {
        let service = billing_service(Vec::new());
        let result = service.stop_assignment(AssignmentId::new(5), None).await;
        assert!(matches!(result, Err(BillingError::AssignmentNotFound(_))));
    }

    #[tokio::test]
    async fn test_issue_invoice_numbers_sequentially() {
        let service = billing_service(vec![AssignmentBuilder::new(1)
            .billing_start(2025, 1, 1)
            .stopped_on(2025, 3, 31)
            .build()]);

        let issue = |months: &[&str]| domain_billing::IssueInvoiceRequest {
            preview: request(months),
            invoice_number: None,
            document: InvoiceDocument::pdf("invoice.pdf", b"%PDF-1.7".to_vec()),
        };

        let first = service.issue_invoice(issue(&["2025-01-01"])).await.unwrap();
        let second = service
            .issue_invoice(issue(&["2025-02-01", "2025-03-01"]))
            .await
            .unwrap();

        assert_eq!(first.invoice_number, "INV-1-202501-0001");
        assert_eq!(second.invoice_number, "INV-1-202502-0002");
        assert_eq!(second.total, Money::new(dec!(200.00)));
        assert_eq!(second.billed_months, vec![month(2025, 2), month(2025, 3)]);

        let listed = service.list_invoices(Some(IdFixtures::client())).await.unwrap();
        assert_eq!(listed.len(), 2);
        let fetched = service.get_invoice(first.id).await.unwrap();
        assert_eq!(fetched.document.size(), 8);
    }

    #[tokio::test]
    async fn test_generated_number_skips_manual_numbers() {
        let service = billing_service(vec![AssignmentBuilder::new(1).billing_start(2025, 1, 1).build()]);
        let issue = |number: Option<&str>| domain_billing::IssueInvoiceRequest {
            preview: request(&["2025-01-01"]),
            invoice_number: number.map(str::to_string),
            document: InvoiceDocument::pdf("invoice.pdf", b"%PDF-1.7".to_vec()),
        };

        let manual = service.issue_invoice(issue(Some("INV-1-202501-0002"))).await.unwrap();
        assert_eq!(manual.invoice_number, "INV-1-202501-0002");

        let generated = service.issue_invoice(issue(None)).await.unwrap();
        assert_eq!(generated.invoice_number, "INV-1-202501-0003");
        let next = service.issue_invoice(issue(None)).await.unwrap();
        assert_eq!(next.invoice_number, "INV-1-202501-0004");

        let duplicate = service.issue_invoice(issue(Some("INV-1-202501-0003"))).await;
        assert!(matches!(duplicate, Err(BillingError::Port(e)) if !e.is_not_found()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_issues_get_distinct_numbers() {
        let service = billing_service(vec![AssignmentBuilder::new(1).billing_start(2025, 1, 1).build()]);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .issue_invoice(domain_billing::IssueInvoiceRequest {
                            preview: request(&["2025-01-01"]),
                            invoice_number: None,
                            document: InvoiceDocument::pdf("invoice.pdf", b"%PDF-1.7".to_vec()),
                        })
                        .await
                })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap().invoice_number);
        }
        numbers.sort();
        assert_eq!(
            numbers,
            vec![
                "INV-1-202501-0001",
                "INV-1-202501-0002",
                "INV-1-202501-0003",
                "INV-1-202501-0004"
            ]
        );
    }

    #[tokio::test]
    async fn test_issue_invoice_with_nothing_billable() {
        let service = billing_service(Vec::new());
        let result = service
            .issue_invoice(domain_billing::IssueInvoiceRequest {
                preview: request(&["2025-01-01"]),
                invoice_number: None,
                document: InvoiceDocument::pdf("empty.pdf", Vec::new()),
            })
            .await;
        assert!(matches!(result, Err(BillingError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_service_catalog_lifecycle() {
        let service = billing_service(Vec::new());

        let created = service.create_service("  Dark Fiber ", "admin").await.unwrap();
        assert_eq!(created.name, "Dark Fiber");
        assert_eq!(created.id, ServiceId::new(4));

        let updated = service
            .update_service(
                created.id,
                ServiceUpdate {
                    name: None,
                    active: Some(false),
                },
            )
            .await
            .unwrap();
        assert!(!updated.active);
        assert!(updated.updated_at.is_some());

        service.delete_service(created.id).await.unwrap();
        let result = service.get_service(created.id).await;
        assert!(matches!(result, Err(BillingError::ServiceNotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_service_name_is_conflict() {
        let service = billing_service(Vec::new());
        let result = service.create_service("ip transit", "admin").await;
        assert!(matches!(result, Err(BillingError::Port(e)) if !e.is_not_found()));
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_is_conflict() {
        let service = billing_service(Vec::new());
        let result = service
            .update_service(
                IdFixtures::transit(),
                ServiceUpdate {
                    name: Some("colocation".to_string()),
                    active: None,
                },
            )
            .await;
        assert!(matches!(result, Err(BillingError::Port(e)) if !e.is_not_found()));
        assert_eq!(service.get_service(IdFixtures::transit()).await.unwrap().name, "IP Transit");
    }

    #[tokio::test]
    async fn test_blank_service_name_is_invalid() {
        let service = billing_service(Vec::new());
        let result = service.create_service("   ", "admin").await;
        assert!(matches!(result, Err(BillingError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_list_assignments_filters_by_client() {
        let service = billing_service(vec![
            AssignmentBuilder::new(1).build(),
            AssignmentBuilder::new(2).client(2).build(),
        ]);
        assert_eq!(service.list_assignments(None).await.unwrap().len(), 2);
        assert_eq!(
            service.list_assignments(Some(ClientId::new(2))).await.unwrap().len(),
            1
        );
    }
}

// ============================================================================
// Client Tests
// ============================================================================

mod client_tests {
    use super::*;
    use domain_billing::NewClient;

    fn billing_service() -> BillingService {
        BillingService::new(
            Arc::new(InMemoryClientStore::with_clients(ClientFixtures::clients())),
            Arc::new(InMemoryAssignmentStore::default()),
            Arc::new(InMemoryServiceStore::with_services(CatalogFixtures::services())),
            Arc::new(InMemoryInvoiceStore::default()),
            Timezone::default(),
        )
    }

    #[tokio::test]
    async fn test_register_client() {
        let service = billing_service();
        let client = service
            .create_client(NewClient {
                name: "  Gamma Networks ".to_string(),
                ..ClientFixtures::new_client("unused")
            })
            .await
            .unwrap();

        assert_eq!(client.id, ClientId::new(3));
        assert_eq!(client.name, "Gamma Networks");
        assert!(client.active);
        assert_eq!(service.get_client(client.id).await.unwrap(), client);
    }

    #[tokio::test]
    async fn test_register_client_without_address_is_invalid() {
        let service = billing_service();
        let result = service
            .create_client(NewClient {
                address: " ".to_string(),
                ..ClientFixtures::new_client("Gamma")
            })
            .await;
        assert!(matches!(result, Err(BillingError::InvalidInput(_))));
        assert_eq!(service.list_clients(0, 100).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_clients_pages() {
        let service = billing_service();
        service.create_client(ClientFixtures::new_client("Gamma")).await.unwrap();

        let names = |clients: Vec<domain_billing::Client>| -> Vec<String> {
            clients.into_iter().map(|c| c.name).collect()
        };
        assert_eq!(
            names(service.list_clients(0, 100).await.unwrap()),
            vec!["Acme Corp", "Beta Ltd", "Gamma"]
        );
        assert_eq!(names(service.list_clients(1, 1).await.unwrap()), vec!["Beta Ltd"]);
    }

    #[tokio::test]
    async fn test_toggle_client_status() {
        let service = billing_service();

        let reactivated = service.set_client_active(IdFixtures::other_client(), true).await.unwrap();
        assert!(reactivated.active);
        assert!(reactivated.updated_at.is_some());

        let deactivated = service.set_client_active(IdFixtures::client(), false).await.unwrap();
        assert!(!deactivated.active);
    }

    #[tokio::test]
    async fn test_unknown_client_is_not_found() {
        let service = billing_service();
        let id = ClientId::new(99);
        assert!(matches!(service.get_client(id).await, Err(BillingError::ClientNotFound(c)) if c == id));
        assert!(matches!(
            service.set_client_active(id, false).await,
            Err(BillingError::ClientNotFound(_))
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;
    use chrono::Datelike;

    fn as_of() -> NaiveDate {
        TemporalFixtures::far_future()
    }

    proptest! {
        #[test]
        fn prop_days_within_month(a in assignment_strategy(), m in billing_month_strategy()) {
            if let Some(p) = prorate(&a, m, as_of()).unwrap() {
                prop_assert!(p.days >= 1);
                prop_assert!(p.days <= m.days());
            }
        }

        #[test]
        fn prop_amount_never_exceeds_rate(a in assignment_strategy()) {
            let rate = a.rate.unwrap_or_default();
            let mut m = a.service_start_month;
            for _ in 0..18 {
                if let Some(p) = prorate(&a, m, as_of()).unwrap() {
                    prop_assert!(p.amount >= Money::zero());
                    prop_assert!(p.amount <= rate);
                }
                m = m.next().unwrap();
            }
        }

        #[test]
        fn prop_full_month_bills_exact_rate(rate in rate_strategy(), m in billing_month_strategy()) {
            let first = m.first_day();
            let a = AssignmentBuilder::new(1)
                .service_start_month(m)
                .billing_start(first.year(), first.month(), first.day())
                .rate(rate.amount())
                .build();

            let p = prorate(&a, m, as_of()).unwrap().unwrap();
            prop_assert_eq!(p.days, m.days());
            prop_assert_eq!(p.amount, rate);
        }

        #[test]
        fn prop_days_sum_to_billable_range(a in assignment_strategy()) {
            prop_assume!(a.service_stop_date.is_some());
            let range = a.billable_range(as_of()).unwrap();
            let last = BillingMonth::containing(range.end.unwrap());

            let mut total = 0;
            let mut m = BillingMonth::containing(range.start);
            loop {
                total += prorate(&a, m, as_of()).unwrap().map_or(0, |p| p.days);
                if m == last {
                    break;
                }
                m = m.next().unwrap();
            }
            prop_assert_eq!(Some(total), range.days());
        }

        #[test]
        fn prop_preview_total_is_sum_of_items(
            assignments in proptest::collection::vec(assignment_strategy(), 0..6),
            m in billing_month_strategy(),
        ) {
            let preview = preview_for(&[m, m.next().unwrap()], &assignments);
            let sum: Money = preview
                .months
                .iter()
                .flat_map(|m| m.services.iter().map(|s| s.prorated_amount))
                .sum();
            prop_assert_eq!(preview.total(), sum);

            for month in &preview.months {
                let ids: Vec<_> = month.services.iter().map(|s| s.assignment_id).collect();
                let mut sorted = ids.clone();
                sorted.sort();
                prop_assert_eq!(ids, sorted);
            }
        }
    }

}
