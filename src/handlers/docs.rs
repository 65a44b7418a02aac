use utoipa::OpenApi;

use super::{cart, catalog, merchant, orders, wishlist};

#[derive(OpenApi)]
#[openapi(
    paths(
        catalog::search_products,
        catalog::get_product,
        cart::view_cart,
        cart::cart_count,
        cart::add_item,
        cart::update_quantity,
        cart::remove_item,
        cart::clear_cart,
        orders::place_order,
        orders::get_order,
        orders::list_orders,
        orders::cancel_order,
        merchant::create_product,
        merchant::list_all_orders,
        merchant::update_status,
        merchant::mark_shipped,
        merchant::mark_delivered,
        merchant::record_payment,
        wishlist::list_wishlist,
        wishlist::add_to_wishlist,
        wishlist::remove_from_wishlist,
    ),
    components(schemas(
        catalog::ProductResponse,
        cart::AddToCartRequest,
        cart::UpdateQuantityRequest,
        cart::CartLineResponse,
        cart::CartResponse,
        cart::CartCountResponse,
        orders::OrderLineResponse,
        orders::OrderResponse,
        orders::ListOrdersResponse,
        merchant::CreateProductRequest,
        merchant::UpdateStatusRequest,
        merchant::ShipRequest,
        wishlist::AddToWishlistRequest,
        wishlist::WishlistItemResponse,
    )),
    tags(
        (name = "catalog", description = "Product browsing"),
        (name = "cart", description = "Shopping cart"),
        (name = "orders", description = "Checkout and order history"),
        (name = "merchant", description = "Catalog and fulfilment management"),
        (name = "wishlist", description = "Saved products"),
    )
)]
pub struct ApiDoc;
