//! Host UI registration: the callback page and per-provider login buttons.
//!
//! Everything here is data handed to the host's customization layer; no
//! decision logic lives in these descriptors. Shapes serialize camelCase to
//! match the host's JS-side customization config.

// self
use crate::{_prelude::*, flow::Doorman, http::ImageHttpClient, state::StateToken};

/// Component file of the callback page, under the host's plugin alias.
pub const CALLBACK_PAGE_COMPONENT: &str = "@@/plugins/oauth2-doorman/OAuthCallback.vue";
/// Component file of the login-button injection, under the host's plugin alias.
pub const LOGIN_BUTTONS_COMPONENT: &str = "@@/plugins/oauth2-doorman/OAuthLoginButtons.vue";

/// Frontend component reference plus its free-form `meta` payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
	/// Component file path, typically under the host's `@@/` alias.
	pub file: String,
	/// Free-form payload the component receives at render time.
	pub meta: serde_json::Value,
}

/// Routed page backed by a frontend component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageDescriptor {
	/// Path the page is served under.
	pub path: String,
	/// Component rendering the page.
	pub component: ComponentDescriptor,
}

/// Injection points of the host's login page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInjections {
	/// Components rendered below the credential inputs.
	pub under_inputs: Vec<ComponentDescriptor>,
}

/// Host customization registry the doorman pushes its UI into.
///
/// Owning the injection vectors by value is what keeps registration total: the
/// host never has to pre-create them before handing the registry over.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationRegistry {
	/// Pages registered by plugins, served next to the host's own routes.
	pub custom_pages: Vec<PageDescriptor>,
	/// Login-page injection points.
	pub login_page_injections: LoginInjections,
}

/// One login button rendered by the frontend component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginButton {
	/// Stable provider identifier.
	pub provider: String,
	/// Label shown next to (or instead of) the icon.
	pub label: String,
	/// Inline icon markup or asset reference.
	pub icon: String,
	/// Authorization URL with the encoded state token already appended.
	pub auth_url: String,
}

impl<C> Doorman<C>
where
	C: ?Sized + ImageHttpClient,
{
	/// Builds one login-button descriptor per adapter.
	///
	/// Each button carries the adapter's authorization URL with the encoded
	/// state token appended, so the frontend only has to render an anchor.
	pub fn login_buttons(&self) -> Vec<LoginButton> {
		self.adapters
			.iter()
			.map(|adapter| {
				let state = StateToken::new(adapter.provider_id().clone()).encode();
				let mut auth_url = adapter.authorization_url();

				auth_url.query_pairs_mut().append_pair("state", &state);

				LoginButton {
					provider: adapter.provider_id().to_string(),
					label: adapter.display_name().to_owned(),
					icon: adapter.icon().to_owned(),
					auth_url: auth_url.into(),
				}
			})
			.collect()
	}

	/// Registers the callback page and the login-button injection on the host.
	///
	/// Re-running the registration replaces the descriptors owned by this
	/// doorman instead of appending, so a repeated resource-config pass
	/// refreshes them rather than stacking duplicates. `base_url` is the
	/// host's public base URL, forwarded to both components through `meta`.
	pub fn register_login_ui(&self, registry: &mut CustomizationRegistry, base_url: &str) {
		registry.custom_pages.retain(|page| page.component.file != CALLBACK_PAGE_COMPONENT);
		registry
			.login_page_injections
			.under_inputs
			.retain(|injection| injection.file != LOGIN_BUTTONS_COMPONENT);
		registry.custom_pages.push(PageDescriptor {
			path: self.options.callback_path.clone(),
			component: ComponentDescriptor {
				file: CALLBACK_PAGE_COMPONENT.into(),
				meta: serde_json::json!({
					"title": "OAuth Callback",
					"customLayout": true,
					"baseUrl": base_url,
				}),
			},
		});
		registry.login_page_injections.under_inputs.push(ComponentDescriptor {
			file: LOGIN_BUTTONS_COMPONENT.into(),
			meta: serde_json::json!({
				"providers": self.login_buttons(),
				"iconOnly": self.options.buttons.icon_only,
				"pill": self.options.buttons.pill,
				"baseUrl": base_url,
			}),
		});
	}
}
