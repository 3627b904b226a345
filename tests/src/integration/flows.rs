//! # Custody Chain Flows
//!
//! Drives batches through the whole chain via `BatchLedgerApi` and checks
//! the resulting records:
//!
//! 1. **Happy path**: producer → slaughterhouse → authority → distributor → retailer → sold
//! 2. **Rejection branch**: certification refused, batch frozen
//! 3. **Refused operations**: every failure leaves the ledger untouched
//! 4. **Role churn**: revocation takes effect on the next call
//! 5. **Command envelope**: the same flow submitted as JSON requests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hc_01_batch_ledger::prelude::*;
    use hc_01_batch_ledger::{
        CertificateRecord, NoOpSink, Operation, RecordingSink, StatusChange, TransferRecord,
    };

    use crate::fixtures::{staffed_ledger, Actors, CERT_HASH, GENESIS_TIME};

    // =============================================================================
    // HAPPY PATH
    // =============================================================================

    #[test]
    fn test_full_custody_chain_records_every_step() {
        let (actors, clock, ledger) = staffed_ledger(Arc::new(NoOpSink));

        let id = ledger.create_batch(&actors.producer, "Wagyu").unwrap();
        clock.advance(10);
        ledger.record_slaughter(&actors.slaughterhouse, id, true).unwrap();
        clock.advance(10);
        ledger.certify(&actors.authority, id, CERT_HASH, true).unwrap();
        clock.advance(10);
        ledger
            .transfer_ownership(&actors.producer, id, actors.distributor)
            .unwrap();
        clock.advance(10);
        ledger
            .transfer_ownership(&actors.distributor, id, actors.retailer)
            .unwrap();
        clock.advance(10);
        ledger.mark_sold(&actors.retailer, id).unwrap();

        let batch = ledger.get_batch(id).unwrap();
        assert_eq!(batch.status(), BatchStatus::Sold);
        assert_eq!(batch.current_owner(), None);
        assert_eq!(batch.producer(), actors.producer);
        assert_eq!(batch.certificate_hash(), CERT_HASH);
        assert_eq!(batch.slaughter_attestation(), Some(true));
        assert_eq!(batch.created_at(), GENESIS_TIME);

        let expected: Vec<StatusChange> = [
            BatchStatus::Created,
            BatchStatus::PendingCertification,
            BatchStatus::CertifiedHalal,
            BatchStatus::InTransit,
            BatchStatus::AtRetailer,
            BatchStatus::Sold,
        ]
        .into_iter()
        .zip((0..).map(|step| GENESIS_TIME + step * 10))
        .map(|(status, changed_at)| StatusChange { status, changed_at })
        .collect();
        assert_eq!(ledger.status_history(id).unwrap(), expected);

        assert_eq!(
            ledger.certificate_history(id).unwrap(),
            vec![CertificateRecord {
                certificate_hash: CERT_HASH.to_string(),
                is_halal: true,
                certified_at: GENESIS_TIME + 20,
            }]
        );
        assert_eq!(
            ledger.transfer_history(id).unwrap(),
            vec![
                TransferRecord {
                    from: actors.producer,
                    to: actors.distributor,
                    transferred_at: GENESIS_TIME + 30,
                },
                TransferRecord {
                    from: actors.distributor,
                    to: actors.retailer,
                    transferred_at: GENESIS_TIME + 40,
                },
            ]
        );
    }

    #[test]
    fn test_repeated_names_get_gap_free_labels() {
        let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));

        let first = ledger.create_batch(&actors.producer, "Wagyu").unwrap();
        let lamb = ledger.create_batch(&actors.producer, "Lamb").unwrap();
        let second = ledger.create_batch(&actors.producer, "Wagyu").unwrap();

        assert_eq!((first, lamb, second), (BatchId(1), BatchId(2), BatchId(3)));
        assert_eq!(ledger.get_batch_by_label("Wagyu_2").unwrap().id(), second);
        assert_eq!(ledger.get_batch_by_sequence("Lamb", 1).unwrap().id(), lamb);
        assert_eq!(ledger.name_count("Wagyu"), 2);
        assert_eq!(ledger.name_count("Goat"), 0);
        assert_eq!(ledger.batch_count(), 3);

        let err = ledger.get_batch_by_sequence("Wagyu", 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_custody_moves_between_owners() {
        let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));
        let id = actors.certified_batch(&ledger, "Wagyu");

        assert_eq!(ledger.batches_owned_by(&actors.producer).len(), 1);
        ledger
            .transfer_ownership(&actors.producer, id, actors.distributor)
            .unwrap();
        assert!(ledger.batches_owned_by(&actors.producer).is_empty());
        assert_eq!(ledger.batches_owned_by(&actors.distributor)[0].id(), id);

        ledger
            .transfer_ownership(&actors.distributor, id, actors.retailer)
            .unwrap();
        ledger.mark_sold(&actors.retailer, id).unwrap();
        assert!(ledger.batches_owned_by(&actors.retailer).is_empty());
    }

    // =============================================================================
    // REJECTION BRANCH
    // =============================================================================

    #[test]
    fn test_rejected_batch_is_frozen() {
        let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));
        let id = ledger.create_batch(&actors.producer, "Lamb").unwrap();
        ledger.record_slaughter(&actors.slaughterhouse, id, false).unwrap();
        ledger.certify(&actors.authority, id, CERT_HASH, false).unwrap();

        let batch = ledger.get_batch(id).unwrap();
        assert_eq!(batch.status(), BatchStatus::Rejected);
        assert_eq!(batch.current_owner(), Some(actors.producer));

        let err = ledger
            .certify(&actors.authority, id, CERT_HASH, true)
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidTransition {
                operation: Operation::Certify,
                status: BatchStatus::Rejected,
                ..
            }
        ));
        let err = ledger
            .transfer_ownership(&actors.producer, id, actors.distributor)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(ledger.certificate_history(id).unwrap().len(), 1);
    }

    #[test]
    fn test_double_certification_is_refused() {
        let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));
        let id = actors.certified_batch(&ledger, "Wagyu");

        let err = ledger
            .certify(&actors.authority, id, "QmOther", false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        let batch = ledger.get_batch(id).unwrap();
        assert_eq!(batch.status(), BatchStatus::CertifiedHalal);
        assert_eq!(batch.certificate_hash(), CERT_HASH);
    }

    // =============================================================================
    // REFUSED OPERATIONS
    // =============================================================================

    #[test]
    fn test_refusals_leave_no_trace() {
        let sink = Arc::new(RecordingSink::new());
        let (actors, _clock, ledger) = staffed_ledger(Arc::clone(&sink));
        let id = actors.certified_batch(&ledger, "Wagyu");
        let before = ledger.get_batch(id).unwrap();
        let history = ledger.status_history(id).unwrap();
        let emitted = sink.len();

        let refusals = [
            ledger.create_batch(&actors.outsider, "Wagyu").unwrap_err(),
            ledger.create_batch(&actors.producer, "").unwrap_err(),
            ledger
                .record_slaughter(&actors.slaughterhouse, id, true)
                .unwrap_err(),
            ledger
                .transfer_ownership(&actors.distributor, id, actors.retailer)
                .unwrap_err(),
            ledger
                .transfer_ownership(&actors.producer, id, actors.retailer)
                .unwrap_err(),
            ledger.mark_sold(&actors.retailer, id).unwrap_err(),
            ledger
                .grant_role(&actors.producer, Role::Retailer, actors.producer)
                .unwrap_err(),
            ledger.get_batch(BatchId(42)).unwrap_err(),
        ];
        let kinds: Vec<ErrorKind> = refusals.iter().map(LedgerError::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::Authorization,
                ErrorKind::Validation,
                ErrorKind::State,
                ErrorKind::Authorization,
                ErrorKind::Authorization,
                ErrorKind::Authorization,
                ErrorKind::Authorization,
                ErrorKind::NotFound,
            ]
        );

        assert_eq!(ledger.get_batch(id).unwrap(), before);
        assert_eq!(ledger.status_history(id).unwrap(), history);
        assert_eq!(ledger.batch_count(), 1);
        assert_eq!(ledger.name_count("Wagyu"), 1);
        assert!(!ledger.has_role(Role::Retailer, &actors.producer));
        assert_eq!(sink.len(), emitted);
    }

    #[test]
    fn test_sold_batch_cannot_move() {
        let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));
        let id = actors.certified_batch(&ledger, "Wagyu");
        actors.sell(&ledger, id);

        // Custody is gone, so every custody operation is an authorization failure.
        let err = ledger
            .transfer_ownership(&actors.retailer, id, actors.retailer)
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotOwner { .. }));
        let err = ledger.mark_sold(&actors.retailer, id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    // =============================================================================
    // ROLE CHURN
    // =============================================================================

    #[test]
    fn test_revocation_takes_effect_immediately() {
        let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));
        let id = actors.certified_batch(&ledger, "Wagyu");

        assert!(ledger
            .revoke_role(&actors.admin, Role::Distributor, actors.distributor)
            .unwrap());
        let err = ledger
            .transfer_ownership(&actors.producer, id, actors.distributor)
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::RecipientMissingRole {
                role: Role::Distributor,
                ..
            }
        ));

        assert!(ledger
            .grant_role(&actors.admin, Role::Distributor, actors.distributor)
            .unwrap());
        ledger
            .transfer_ownership(&actors.producer, id, actors.distributor)
            .unwrap();
    }

    #[test]
    fn test_personas_and_role_log() {
        let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));

        assert_eq!(ledger.persona(&actors.admin), Persona::Admin);
        assert_eq!(ledger.persona(&actors.authority), Persona::HalalAuthority);
        assert_eq!(ledger.persona(&actors.outsider), Persona::Public);
        assert!(ledger.is_admin(&actors.admin));
        assert!(!ledger.is_admin(&actors.producer));

        // Granting twice is accepted but changes nothing.
        assert!(!ledger
            .grant_role(&actors.admin, Role::Producer, actors.producer)
            .unwrap());
        let history = ledger.role_history();
        assert_eq!(history.len(), 6);
        assert!(history[..5].iter().all(|change| change.changed));
        assert!(!history[5].changed);
        assert_eq!(ledger.roles_of(&actors.producer).len(), 1);
    }

    // =============================================================================
    // COMMAND ENVELOPE
    // =============================================================================

    #[test]
    fn test_json_requests_drive_the_same_flow() {
        let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));

        let requests = serde_json::json!([
            {"caller": actors.producer, "payload": {"op": "create_batch", "name": "Wagyu"}},
            {"caller": actors.slaughterhouse, "payload": {"op": "record_slaughter", "id": 1, "attested_halal": true}},
            {"caller": actors.authority, "payload": {"op": "certify", "id": 1, "certificate_hash": CERT_HASH, "is_halal": true}},
            {"caller": actors.producer, "payload": {"op": "transfer_ownership", "id": 1, "new_owner": actors.distributor}},
        ]);
        let requests: Vec<AuthenticatedRequest<LedgerCommand>> =
            serde_json::from_value(requests).unwrap();

        let outcomes: Vec<CommandOutcome> = requests
            .into_iter()
            .map(|request| ledger.submit(request).unwrap())
            .collect();
        assert_eq!(outcomes[0], CommandOutcome::Created { id: BatchId(1) });
        assert!(outcomes[1..]
            .iter()
            .all(|outcome| *outcome == CommandOutcome::Applied));
        assert_eq!(
            ledger.get_batch(BatchId(1)).unwrap().status(),
            BatchStatus::InTransit
        );
    }

    #[test]
    fn test_unsupported_version_is_refused() {
        let (actors, _clock, ledger) = staffed_ledger(Arc::new(NoOpSink));
        let mut request = AuthenticatedRequest::new(
            actors.producer,
            LedgerCommand::CreateBatch {
                name: "Wagyu".into(),
            },
        );
        request.version = 99;

        let err = ledger.submit(request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(ledger.batch_count(), 0);
    }
}
