mod common;
mod notices;
mod payments;
mod results;
mod roster;
mod schools;

pub use common::{
    AccessDecisionResponse, DashboardSummaryResponse, HealthResponse, MeResponse, PublishRequest,
};
pub use notices::{
    CreateNoticeRequest, DraftNoticeRequest, DraftNoticeResponse, NoticeResponse,
};
pub use payments::{
    PaymentDecisionRequest, PaymentReceiptResponse, PaymentResponse, SubmitPaymentRequest,
};
pub use results::{GradeSheetResponse, PreviewGpaRequest, RecordResultRequest, ResultResponse};
pub use roster::{CreateStudentRequest, CreateTeacherRequest, StudentResponse, TeacherResponse};
pub use schools::{
    CreateSchoolRequest, SchoolResponse, UpdateSchoolStatusRequest, UpdateSubscriptionRequest,
};

#[cfg(test)]
mod tests {
    use super::common::SubscriptionOverviewResponse;
    use super::results::{GradedSubjectResponse, SubjectMarkRequest};
    use super::{
        AccessDecisionResponse, CreateNoticeRequest, CreateSchoolRequest, CreateStudentRequest,
        CreateTeacherRequest, DashboardSummaryResponse, DraftNoticeRequest, DraftNoticeResponse,
        GradeSheetResponse, HealthResponse, MeResponse, NoticeResponse, PaymentDecisionRequest,
        PaymentReceiptResponse, PaymentResponse, PreviewGpaRequest, PublishRequest,
        RecordResultRequest, ResultResponse, SchoolResponse, StudentResponse,
        SubmitPaymentRequest, TeacherResponse, UpdateSchoolStatusRequest,
        UpdateSubscriptionRequest,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        ErrorResponse::export(&config)?;
        HealthResponse::export(&config)?;
        MeResponse::export(&config)?;
        AccessDecisionResponse::export(&config)?;
        SubscriptionOverviewResponse::export(&config)?;
        DashboardSummaryResponse::export(&config)?;
        PublishRequest::export(&config)?;
        CreateSchoolRequest::export(&config)?;
        UpdateSubscriptionRequest::export(&config)?;
        UpdateSchoolStatusRequest::export(&config)?;
        SchoolResponse::export(&config)?;
        CreateStudentRequest::export(&config)?;
        StudentResponse::export(&config)?;
        CreateTeacherRequest::export(&config)?;
        TeacherResponse::export(&config)?;
        SubjectMarkRequest::export(&config)?;
        RecordResultRequest::export(&config)?;
        PreviewGpaRequest::export(&config)?;
        GradedSubjectResponse::export(&config)?;
        GradeSheetResponse::export(&config)?;
        ResultResponse::export(&config)?;
        SubmitPaymentRequest::export(&config)?;
        PaymentDecisionRequest::export(&config)?;
        PaymentResponse::export(&config)?;
        PaymentReceiptResponse::export(&config)?;
        CreateNoticeRequest::export(&config)?;
        DraftNoticeRequest::export(&config)?;
        DraftNoticeResponse::export(&config)?;
        NoticeResponse::export(&config)?;

        Ok(())
    }
}
