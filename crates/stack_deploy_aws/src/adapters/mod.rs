pub mod cloudformation;
pub mod s3;
pub mod sleeper;

use std::future::Future;

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use stack_deploy_core::BackendError;

/// Drives an SDK future to completion from synchronous core code running on
/// a multi-thread runtime worker.
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Maps an SDK failure to a [`BackendError`], keeping service responses
/// (error code, HTTP status) apart from transport failures.
pub(crate) fn backend_error<E>(operation: &str, error: SdkError<E, HttpResponse>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match &error {
        SdkError::ServiceError(context) => {
            let service_error = context.err();
            let code = service_error.code().map(str::to_string);
            let message = service_error
                .message()
                .map(str::to_string)
                .or_else(|| code.clone())
                .unwrap_or_else(|| DisplayErrorContext(&error).to_string());
            BackendError::service(operation, code, message)
                .with_http_status(context.raw().status().as_u16())
        }
        _ => BackendError::transport(operation, DisplayErrorContext(&error).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_cloudformation::operation::update_stack::UpdateStackError;
    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::operation::head_bucket::HeadBucketError;
    use aws_smithy_runtime_api::http::StatusCode;
    use aws_smithy_types::body::SdkBody;
    use stack_deploy_core::error::BackendErrorKind;

    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse::new(
            StatusCode::try_from(status).expect("valid status code"),
            SdkBody::empty(),
        )
    }

    #[test]
    fn unchanged_stack_update_maps_to_no_updates() {
        let error = SdkError::service_error(
            UpdateStackError::generic(
                ErrorMetadata::builder()
                    .code("ValidationError")
                    .message("No updates are to be performed.")
                    .build(),
            ),
            response(400),
        );

        let mapped = backend_error("UpdateStack", error);

        assert_eq!(mapped.kind(), BackendErrorKind::Service);
        assert_eq!(mapped.operation(), "UpdateStack");
        assert_eq!(mapped.code(), Some("ValidationError"));
        assert_eq!(mapped.http_status(), Some(400));
        assert!(mapped.is_no_updates());
        assert!(!mapped.is_not_found());
    }

    #[test]
    fn missing_bucket_head_maps_to_not_found() {
        // HeadBucket has no body, so the 404 status is all there is.
        let error = SdkError::service_error(
            HeadBucketError::generic(ErrorMetadata::builder().build()),
            response(404),
        );

        let mapped = backend_error("HeadBucket", error);

        assert_eq!(mapped.kind(), BackendErrorKind::Service);
        assert_eq!(mapped.http_status(), Some(404));
        assert!(mapped.is_not_found());
        assert!(!mapped.message().is_empty());
    }

    #[test]
    fn forbidden_bucket_head_is_a_service_error_but_not_missing() {
        let error = SdkError::service_error(
            HeadBucketError::generic(ErrorMetadata::builder().code("Forbidden").build()),
            response(403),
        );

        let mapped = backend_error("HeadBucket", error);

        assert!(mapped.is_service());
        assert_eq!(mapped.message(), "Forbidden");
        assert!(!mapped.is_not_found());
    }

    #[test]
    fn timeout_maps_to_transport_error() {
        let error: SdkError<HeadBucketError, HttpResponse> =
            SdkError::timeout_error("request timed out");

        let mapped = backend_error("HeadBucket", error);

        assert_eq!(mapped.kind(), BackendErrorKind::Transport);
        assert_eq!(mapped.http_status(), None);
        assert!(!mapped.is_not_found());
        assert!(!mapped.is_no_updates());
    }
}
