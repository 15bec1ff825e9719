/// Header, footer and news block shared by every fixture page.
fn layout(title: &str, main: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <meta name="description" content="Книги с доставкой по Москве">
  <meta name="keywords" content="книги, магазин">
</head>
<body>
  <header class="header">
    <a class="header__logo" href="/"><img src="/local/img/logo.png" alt=""></a>
    <div class="header__schedule">Пн-Пт 10-20/Сб 11-18</div>
    <div class="header__phones"><a class="header__phone-item" href="tel:+74951234567">+7 (495) 123-45-67</a></div>
  </header>
  <nav class="breadcrumbs">
    <span class="breadcrumbs__breadcrumb"><a href="/">Главная</a></span>
    <span class="breadcrumbs__breadcrumb"><a href="/catalog/">Каталог</a></span>
  </nav>
  <main>{main}</main>
  <aside class="side-contacts">
    <div class="side-contacts__name">books@shop.example</div>
  </aside>
  <section class="news">
    <div class="news__list">
      <article class="news__item">
        <h3 class="news__name"><a href="/news/new-arrivals/">Новые поступления</a></h3>
        <span class="news__time">12.3.2024</span>
      </article>
    </div>
  </section>
</body>
</html>"#
    )
}

pub fn catalogue_page() -> String {
    layout(
        "Каталог",
        r#"<div class="sorting">
      <a class="sorting__item sorting__item_active" href="/catalog/?sort=name">По названию</a>
      <a class="sorting__item" href="/catalog/?sort=price">По цене</a>
    </div>
    <ul class="product-list">
      <li class="product-list__item">
        <a class="product-list__image" href="/catalog/master-i-margarita/"><img src="/upload/mm.jpg"></a>
        <div class="product-list__info">
          <a class="product-list__name" href="/catalog/master-i-margarita/">Мастер и Маргарита</a>
          <p class="product-list__desc">Роман Михаила Булгакова</p>
        </div>
        <datalist>
          <option value="product_price">720 руб.</option>
          <option value="product_year">2021</option>
          <option value="product_author">Михаил Булгаков</option>
        </datalist>
      </li>
      <li class="product-list__item">
        <a class="product-list__image" href="/catalog/idiot/"><img src="/upload/idiot.jpg"></a>
        <div class="product-list__info">
          <a class="product-list__name" href="/catalog/idiot/">Идиот</a>
        </div>
        <datalist><option value="product_price">нет в наличии</option></datalist>
      </li>
    </ul>
    <div class="navigation">
      <div class="navigation__pages"><a href="/catalog/?page=1">1</a><a href="/catalog/?page=2">2</a></div>
    </div>"#,
    )
}

pub fn product_page() -> String {
    layout(
        "Мастер и Маргарита",
        r#"<div class="product-info">
      <h1 class="product-info__name">Мастер и Маргарита</h1>
      <div class="product-info__image"><img src="/upload/mm-big.jpg"></div>
      <dl>
        <dt class="product-info__left">Автор</dt><dd class="product-info__text">Михаил Булгаков</dd>
        <dt class="product-info__left">Год издания</dt><dd class="product-info__text">2021</dd>
      </dl>
      <div class="product-info__price">720 руб.</div>
    </div>"#,
    )
}

pub fn contacts_page() -> String {
    layout("Контакты", "<p>Мы находимся в центре Москвы.</p>")
}
