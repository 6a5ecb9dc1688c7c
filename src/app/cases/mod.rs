pub mod auth;
pub mod users;

use crate::core::runner::TestSuite;
use auth::LoginCase;
use users::{
    CreateUserCase, ExpectedUser, ListUsersCase, SingleUserCase, UserNotFoundCase,
    REQRES_SUPPORT_TEXT,
};

pub const DEFAULT_SUITE_NAME: &str = "reqres-smoke";

/// Every built-in ReqRes case, in run order.
pub fn default_suite(name: &str) -> TestSuite {
    let mut suite = TestSuite::new(name);

    suite.add_case(Box::new(ListUsersCase::default()));
    suite.add_case(Box::new(
        SingleUserCase::new(ExpectedUser::new(1, "george.bluth@reqres.in", "George", "Bluth"))
            .with_support_text(REQRES_SUPPORT_TEXT),
    ));
    suite.add_case(Box::new(SingleUserCase::new(ExpectedUser::new(
        2,
        "janet.weaver@reqres.in",
        "Janet",
        "Weaver",
    ))));
    suite.add_case(Box::new(UserNotFoundCase::new(23)));
    suite.add_case(Box::new(CreateUserCase::new("morpheus", "leader")));
    suite.add_case(Box::new(LoginCase));

    suite
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_suite_case_names() {
        let suite = default_suite(DEFAULT_SUITE_NAME);
        assert_eq!(suite.name(), "reqres-smoke");
        assert_eq!(
            suite.case_names(),
            vec![
                "list-users",
                "single-user-1",
                "single-user-2",
                "user-not-found",
                "create-user",
                "login"
            ]
        );
    }
}
