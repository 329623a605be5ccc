use crate::domain::enrollment::{EnrollmentReceipt, EnrollmentRecord, PaymentRecord, StoreResponse};
use crate::domain::ports::EnrollmentStore;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Column Family for enrollment documents, keyed by enrollment id.
pub const CF_ENROLLMENTS: &str = "enrollments";
/// Column Family for payment documents, keyed by gateway payment id.
pub const CF_PAYMENTS: &str = "payments";

/// A persistent enrollment store backed by RocksDB.
///
/// Enrollments and payments live in separate Column Families and are written
/// through a single `WriteBatch`, so a crash can never leave one without the
/// other. The write lock serialises the duplicate check with the write.
///
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "enrollments" and "payments" column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_enrollments = ColumnFamilyDescriptor::new(CF_ENROLLMENTS, Options::default());
        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_enrollments, cf_payments])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            CheckoutError::StoreError(format!("{} column family not found", name))
        })
    }

    pub fn enrollment(&self, enrollment_id: &str) -> Result<Option<EnrollmentRecord>> {
        let cf = self.cf(CF_ENROLLMENTS)?;
        match self.db.get_cf(cf, enrollment_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn payment(&self, payment_id: &str) -> Result<Option<PaymentRecord>> {
        let cf = self.cf(CF_PAYMENTS)?;
        match self.db.get_cf(cf, payment_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl EnrollmentStore for RocksDBStore {
    async fn create_enrollment_with_payment(
        &self,
        enrollment: EnrollmentRecord,
        payment: PaymentRecord,
    ) -> Result<StoreResponse> {
        let _guard = self.write_lock.lock().await;
        let cf_enrollments = self.cf(CF_ENROLLMENTS)?;
        let cf_payments = self.cf(CF_PAYMENTS)?;

        let payment_id = payment.gateway_data.payment_id.clone();
        if self
            .db
            .get_pinned_cf(cf_payments, payment_id.as_bytes())?
            .is_some()
        {
            return Err(CheckoutError::DuplicatePayment(payment_id));
        }

        let enrollment_id = Uuid::new_v4().to_string();
        let mut batch = WriteBatch::default();
        batch.put_cf(
            cf_enrollments,
            enrollment_id.as_bytes(),
            serde_json::to_vec(&enrollment)?,
        );
        batch.put_cf(
            cf_payments,
            payment_id.as_bytes(),
            serde_json::to_vec(&payment)?,
        );
        self.db.write(batch)?;

        Ok(StoreResponse::recorded(EnrollmentReceipt {
            enrollment_id,
            payment_id,
            recorded_at: Utc::now(),
        }))
    }
}
