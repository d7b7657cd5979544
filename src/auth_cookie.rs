//! Defines functions for handling user authentication with cookies.

use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    PrivateCookieJar,
};
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Duration, OffsetDateTime,
};

use crate::Error;

pub(crate) const COOKIE_USER: &str = "user";
pub(crate) const COOKIE_EXPIRY: &str = "expiry";
/// The default duration for which auth cookies are valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(8);

/// Date time format for the cookie expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
         sign:mandatory]:[offset_minute]:[offset_second]"
);

/// Add an auth cookie to the cookie jar, indicating that a user is logged in
/// and authenticated.
///
/// Sets the initial expiry of the cookie to `duration` from the current time.
/// You can use [DEFAULT_COOKIE_DURATION] for the default duration.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns a [time::error::Format] if the expiry time cannot be formatted.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    username: &str,
    duration: Duration,
) -> Result<PrivateCookieJar, time::error::Format> {
    let expiry = OffsetDateTime::now_utc() + duration;
    // Use format instead of to_string to avoid errors at midnight when the hour is printed as
    // a single digit when [DATE_TIME_FORMAT] expects two digits.
    let expiry_string = expiry.format(DATE_TIME_FORMAT)?;

    Ok(jar
        .add(
            Cookie::build((COOKIE_USER, username.to_owned()))
                .expires(expiry)
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(true),
        )
        .add(
            Cookie::build((COOKIE_EXPIRY, expiry_string))
                .expires(expiry)
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(true),
        ))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which
/// should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_USER, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
    .add(
        Cookie::build((COOKIE_EXPIRY, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the logged in username from the cookie jar.
///
/// # Errors
///
/// Returns a:
/// - [Error::CookieMissing] if either the user or expiry cookie is absent,
/// - [Error::InvalidCookieDate] if the expiry cookie cannot be parsed,
/// - [Error::InvalidCredentials] if the expiry is in the past.
pub(crate) fn get_user_from_cookies(jar: &PrivateCookieJar) -> Result<String, Error> {
    let user_cookie = jar.get(COOKIE_USER).ok_or(Error::CookieMissing)?;
    let expiry_cookie = jar.get(COOKIE_EXPIRY).ok_or(Error::CookieMissing)?;

    let expiry = OffsetDateTime::parse(expiry_cookie.value_trimmed(), DATE_TIME_FORMAT)
        .map_err(|error| Error::InvalidCookieDate(error.to_string()))?;

    if expiry < OffsetDateTime::now_utc() {
        return Err(Error::InvalidCredentials);
    }

    Ok(user_cookie.value_trimmed().to_owned())
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{cookie::Key, PrivateCookieJar};
    use sha2::{Digest, Sha512};
    use time::Duration;

    use crate::Error;

    use super::{
        get_user_from_cookies, invalidate_auth_cookie, set_auth_cookie, COOKIE_EXPIRY, COOKIE_USER,
        DEFAULT_COOKIE_DURATION,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    #[test]
    fn can_set_cookie() {
        let jar = get_jar();

        let jar = set_auth_cookie(jar, "ana", DEFAULT_COOKIE_DURATION).unwrap();

        assert!(jar.get(COOKIE_USER).is_some());
        assert!(jar.get(COOKIE_EXPIRY).is_some());
        assert_eq!(get_user_from_cookies(&jar), Ok("ana".to_owned()));
    }

    #[test]
    fn missing_cookie_is_an_error() {
        let jar = get_jar();

        assert_eq!(get_user_from_cookies(&jar), Err(Error::CookieMissing));
    }

    #[test]
    fn expired_cookie_is_rejected() {
        let jar = set_auth_cookie(get_jar(), "ana", Duration::hours(-1)).unwrap();

        assert_eq!(get_user_from_cookies(&jar), Err(Error::InvalidCredentials));
    }

    #[test]
    fn invalidate_auth_cookie_succeeds() {
        let jar = set_auth_cookie(get_jar(), "ana", DEFAULT_COOKIE_DURATION).unwrap();

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_USER).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert!(get_user_from_cookies(&jar).is_err());
    }
}
