use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    audit::AuditEntry,
    backend::{
        CakeSession, CreatedOrder, LoginRequest, LoginResponse, PaymentMethod, SessionStatus,
    },
    domain::{
        cart::{CartLineItem, CartSummary, OrderItemPayload},
        catalog::{
            Category, FlavorSelection, MenuItem, MenuItemKind, MenuItemRef, MenuItemStatus,
            SizeSelection,
        },
        design::{
            CakeDesign, CandleType, Decoration3D, DesignComplexity, DesignPatch, EventType,
            FrostingType, LayerSpec, TextFont, TextPosition, Vec3,
        },
        wizard::{DesignWizard, SubmissionReceipt, SubmissionTarget, WizardStep},
    },
    dto::{
        cart::{AddToCartRequest, CartLineView, CartView, OrderItemList, UpdateQuantityRequest},
        design::{ResetDesignRequest, SubmitDesignResponse},
        handoff::HandoffView,
        menu::{CategoryList, MenuList},
        orders::{CheckoutRequest, CheckoutResponse},
    },
    response::{ApiResponse, Meta},
    routes::{audit, auth, cart, design, handoff, health, menu, orders, params},
    services::cart_store::StorePhase,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        cart::order_items,
        menu::list_menu,
        menu::list_categories,
        design::current_design,
        design::update_design,
        design::next_step,
        design::previous_step,
        design::submit_design,
        design::reset_design,
        handoff::start_handoff,
        handoff::handoff_status,
        handoff::cancel_handoff,
        orders::checkout,
        audit::list_audit
    ),
    components(
        schemas(
            MenuItem,
            MenuItemStatus,
            MenuItemKind,
            MenuItemRef,
            Category,
            FlavorSelection,
            SizeSelection,
            CartLineItem,
            CartSummary,
            OrderItemPayload,
            CakeDesign,
            DesignPatch,
            LayerSpec,
            Vec3,
            Decoration3D,
            EventType,
            FrostingType,
            CandleType,
            TextFont,
            TextPosition,
            DesignComplexity,
            DesignWizard,
            WizardStep,
            SubmissionTarget,
            SubmissionReceipt,
            StorePhase,
            AddToCartRequest,
            UpdateQuantityRequest,
            CartLineView,
            CartView,
            OrderItemList,
            ResetDesignRequest,
            SubmitDesignResponse,
            HandoffView,
            CakeSession,
            SessionStatus,
            MenuList,
            CategoryList,
            CheckoutRequest,
            CheckoutResponse,
            CreatedOrder,
            PaymentMethod,
            LoginRequest,
            LoginResponse,
            AuditEntry,
            audit::AuditLogList,
            params::Pagination,
            params::MenuQuery,
            params::AuditQuery,
            Meta,
            ApiResponse<CartView>,
            ApiResponse<DesignWizard>,
            ApiResponse<MenuList>,
            ApiResponse<CheckoutResponse>,
            ApiResponse<HandoffView>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Menu", description = "Catalog read through the backend"),
        (name = "Cart", description = "Kiosk cart"),
        (name = "Design", description = "Custom cake design wizard"),
        (name = "Handoff", description = "Kiosk-to-mobile custom cake sessions"),
        (name = "Orders", description = "Checkout"),
        (name = "Auth", description = "Backend session"),
        (name = "Audit", description = "Local audit trail"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
