use yew_router::prelude::*;

#[derive(Clone, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/cadastro")]
    Register,
    #[at("/perfil")]
    Profile,
    #[at("/404")]
    #[not_found]
    NotFound,
}

impl Route {
    /// Pages that send a signed-in customer back to the catalog.
    #[must_use]
    pub const fn is_guest_only(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// Pages that redirect to login without a stored identity.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Profile)
    }
}

#[cfg(test)]
mod tests {
    use super::Route;
    use yew_router::Routable;

    #[test]
    fn paths_round_trip() {
        for route in [Route::Home, Route::Login, Route::Register, Route::Profile] {
            assert_eq!(Route::recognize(&route.to_path()), Some(route));
        }
        assert_eq!(Route::not_found_route(), Some(Route::NotFound));
    }

    #[test]
    fn access_rules() {
        assert!(Route::Login.is_guest_only());
        assert!(Route::Register.is_guest_only());
        assert!(!Route::Home.is_guest_only());
        assert!(Route::Profile.requires_login());
        assert!(!Route::Home.requires_login());
    }
}
